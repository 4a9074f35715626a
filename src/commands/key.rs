use anyhow::{Result, bail};

use crate::config::Settings;
use crate::llm::secrets::resolve_configured_api_key;
use crate::llm::{clear_api_key, prompt_for_api_key, store_api_key, test_configured_api_key};

#[derive(Debug, Default)]
pub struct KeyArgs {
    /// `Some(None)` means `--set` was given without a value.
    pub set: Option<Option<String>>,
    pub clear: bool,
    pub test: bool,
}

pub async fn run(settings: &Settings, args: KeyArgs) -> Result<()> {
    let provider = settings.provider;
    let report_only = args.set.is_none() && !args.clear && !args.test;

    if let Some(value) = args.set {
        let key = match value {
            Some(key) => key,
            None => prompt_for_api_key(provider)?,
        };
        if key.trim().is_empty() {
            bail!("No API key provided; nothing stored.");
        }
        store_api_key(provider, &key)?;
        println!("Stored {} API key in the local keyring.", provider.name);
    }

    if args.clear {
        if clear_api_key(provider)? {
            println!("Removed the stored {} API key.", provider.name);
        } else {
            println!("No stored {} API key to remove.", provider.name);
        }
    }

    if args.test {
        let source = test_configured_api_key(settings).await?;
        println!(
            "{} API key from {} works.",
            provider.name,
            source.description()
        );
    }

    if report_only {
        match resolve_configured_api_key(provider)? {
            Some((_, source)) => println!(
                "{} API key configured via {}.",
                provider.name,
                source.description()
            ),
            None => println!(
                "No {} API key configured. Set {} or run `educlimb key --set --provider {}`.",
                provider.name, provider.api_key_env, provider.name
            ),
        }
    }

    Ok(())
}
