use anyhow::{Result, anyhow};

use crate::llm::provider::{DEFAULT_PROVIDER, LlmProvider, find_provider, provider_names};

/// Sampling temperature sent with every feedback request.
pub const FEEDBACK_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: &'static LlmProvider,
    pub model: String,
    pub temperature: f32,
}

impl Settings {
    /// Resolves flags (which clap already merged with `EDUCLIMB_*` env vars) against
    /// the built-in defaults.
    pub fn resolve(provider: Option<&str>, model: Option<&str>) -> Result<Self> {
        let provider_name = provider.unwrap_or(DEFAULT_PROVIDER);
        let provider = find_provider(provider_name).ok_or_else(|| {
            anyhow!(
                "Unknown provider '{}'. Available providers: {}",
                provider_name.trim(),
                provider_names().join(", ")
            )
        })?;

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(provider.default_model)
            .to_string();

        Ok(Self {
            provider,
            model,
            temperature: FEEDBACK_TEMPERATURE,
        })
    }
}
