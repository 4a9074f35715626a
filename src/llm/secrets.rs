use std::env;

use crate::llm::provider::LlmProvider;
use crate::utils::strip_controls_and_escapes;
use anyhow::{Context, Result, anyhow, bail};
use log::warn;

use rpassword::read_password;

use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "com.educlimb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    Keyring,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::Keyring => "local keyring",
        }
    }
}

fn keyring_entry(provider: &LlmProvider) -> Result<Entry> {
    Ok(Entry::new(SERVICE, &format!("{}:default", provider.name))?)
}

pub fn clear_api_key(provider: &LlmProvider) -> Result<bool> {
    let entry = keyring_entry(provider)?;
    match entry.delete_password() {
        Ok(()) => Ok(true),
        Err(KeyringError::NoEntry) => Ok(false),
        Err(err) => Err(anyhow!(err)),
    }
}

pub fn prompt_for_api_key(provider: &LlmProvider) -> Result<String> {
    let dim = "\x1b[2m";
    let reset = "\x1b[0m";
    let green = "\x1b[32m";

    println!(
        "{green}Enter your {} API key{reset}. It's stored in your local keyring for future use.",
        provider.name
    );
    println!("{dim}Input is hidden. Leave blank to cancel.{reset}");

    let mut input = read_password().context("Failed to read API key")?;
    // Make input safe for use in a header
    input = strip_controls_and_escapes(&input);
    Ok(input.trim().to_string())
}

pub fn store_api_key(provider: &LlmProvider, api_key: &str) -> Result<()> {
    let trimmed = api_key.trim();

    if trimmed.is_empty() {
        bail!("Cannot store an empty API key");
    }
    let entry = keyring_entry(provider)?;
    entry.set_password(trimmed)?;
    Ok(())
}

pub fn resolve_configured_api_key(provider: &LlmProvider) -> Result<Option<(String, ApiKeySource)>> {
    if let Some(env_key) = load_env_api_key(provider.api_key_env) {
        return Ok(Some((env_key, ApiKeySource::Environment)));
    }

    if let Some(stored) = load_stored_api_key(provider) {
        return Ok(Some((stored, ApiKeySource::Keyring)));
    }

    Ok(None)
}

fn load_env_api_key(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// An unreachable keyring reads as "no stored key" so callers report the missing
/// credential instead of the platform error.
fn load_stored_api_key(provider: &LlmProvider) -> Option<String> {
    let lookup = keyring_entry(provider).and_then(|entry| Ok(entry.get_password()?));
    match lookup {
        Ok(password) => Some(password),
        Err(err) => {
            if !matches!(err.downcast_ref::<KeyringError>(), Some(KeyringError::NoEntry)) {
                warn!("keyring unavailable for {}: {err:#}", provider.name);
            }
            None
        }
    }
}
