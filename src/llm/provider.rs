use crate::utils::trim_line;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmProvider {
    pub name: &'static str,
    pub base_url: &'static str,
    pub default_model: &'static str,
    pub api_key_env: &'static str,
}

pub const DEFAULT_PROVIDER: &str = "gemini";

pub const LLM_PROVIDERS: &[LlmProvider] = &[
    LlmProvider {
        name: "gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai/",
        default_model: "gemini-2.0-flash",
        api_key_env: "GOOGLE_API_KEY",
    },
    LlmProvider {
        name: "openai",
        base_url: "https://api.openai.com/v1/",
        default_model: "gpt-4o-mini",
        api_key_env: "OPENAI_API_KEY",
    },
];

pub fn find_provider(provider_name: &str) -> Option<&'static LlmProvider> {
    let provider_name = trim_line(provider_name)?;

    LLM_PROVIDERS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(&provider_name))
}

pub fn provider_names() -> Vec<&'static str> {
    LLM_PROVIDERS.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_trimmed_and_case_insensitive() {
        let provider = find_provider("  Gemini ").unwrap();
        assert_eq!(provider.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(find_provider("OPENAI").unwrap().name, "openai");
        assert!(find_provider("").is_none());
        assert!(find_provider("llama").is_none());
    }

    #[test]
    fn default_provider_is_registered() {
        assert!(find_provider(DEFAULT_PROVIDER).is_some());
        assert_eq!(provider_names(), vec!["gemini", "openai"]);
    }
}
