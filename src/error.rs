/// Formats an error and its context chain into lines for the status panel
pub fn format_error_lines(context: &str, error: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![context.to_string()];
    for cause in error.chain() {
        lines.extend(cause.to_string().lines().map(String::from));
    }
    lines
}
