use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use educlimb::commands::{key, write};
use educlimb::config::Settings;
use educlimb::form::ClassLevel;
use educlimb::logging;

#[derive(Parser, Debug)]
#[command(
    name = "educlimb",
    version,
    about = "Your personal writing coach, in the terminal.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Model provider to send essays to
    #[arg(long, value_name = "NAME", env = "EDUCLIMB_PROVIDER")]
    provider: Option<String>,
    /// Model id. Defaults to the provider's default model.
    #[arg(long, value_name = "ID", env = "EDUCLIMB_MODEL")]
    model: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an essay and get feedback on it
    Write {
        /// Preselect the grade, e.g. "Class 3" or just 3
        #[arg(long = "class", value_name = "LEVEL")]
        class_level: Option<ClassLevel>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Manage the API key used to reach the model provider
    Key {
        /// Store a key in the local keyring. Prompts when no value is given.
        #[arg(long, value_name = "KEY", num_args = 0..=1)]
        set: Option<Option<String>>,
        /// Remove the stored key
        #[arg(long)]
        clear: bool,
        /// Check that the configured key is accepted by the provider
        #[arg(long)]
        test: bool,
        #[arg(long, value_name = "NAME", env = "EDUCLIMB_PROVIDER")]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(error) = run_cli().await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    // a missing .env is fine, variables may come from the shell
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if let Err(err) = logging::init() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    match cli.command {
        Command::Write { class_level, model } => {
            let settings = Settings::resolve(model.provider.as_deref(), model.model.as_deref())?;
            write::run(&settings, class_level).await?;
        }
        Command::Key {
            set,
            clear,
            test,
            provider,
        } => {
            let settings = Settings::resolve(provider.as_deref(), None)?;
            key::run(&settings, key::KeyArgs { set, clear, test }).await?;
        }
    }

    Ok(())
}
