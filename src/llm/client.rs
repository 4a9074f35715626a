use anyhow::{Context, Result, anyhow};
use async_openai::{Client, config::OpenAIConfig};
use async_trait::async_trait;
use log::info;

use crate::config::Settings;
use crate::llm::feedback::request_feedback;
use crate::llm::provider::LlmProvider;
use crate::session::FeedbackProvider;

use super::secrets::{ApiKeySource, resolve_configured_api_key};

#[derive(Clone, Debug)]
pub struct LlmClient {
    pub client: Client<OpenAIConfig>,
    pub model: String,
    pub temperature: f32,
}

#[async_trait]
impl FeedbackProvider for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        request_feedback(self, prompt).await
    }
}

/// Builds a client for the configured provider. A missing key is fatal here so the
/// form never opens without a usable credential.
pub fn ensure_client(settings: &Settings) -> Result<LlmClient> {
    let (key, source) = resolve_configured_api_key(settings.provider)?
        .ok_or_else(|| missing_key_error(settings.provider))?;
    info!(
        "using {} model {} with key from {}",
        settings.provider.name,
        settings.model,
        source.description()
    );

    Ok(LlmClient {
        client: initialize_client(settings.provider, &key),
        model: settings.model.clone(),
        temperature: settings.temperature,
    })
}

pub async fn test_configured_api_key(settings: &Settings) -> Result<ApiKeySource> {
    let (key, source) = resolve_configured_api_key(settings.provider)?
        .ok_or_else(|| missing_key_error(settings.provider))?;
    let client = initialize_client(settings.provider, &key);
    healthcheck_client(&client, settings.provider).await?;
    Ok(source)
}

fn missing_key_error(provider: &LlmProvider) -> anyhow::Error {
    anyhow!(
        "No {} API key configured. Set {} or run `educlimb key --set --provider {}`.",
        provider.name,
        provider.api_key_env,
        provider.name
    )
}

fn initialize_client(provider: &LlmProvider, api_key: &str) -> Client<OpenAIConfig> {
    let config = OpenAIConfig::new()
        .with_api_base(provider.base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Client::with_config(config)
}

async fn healthcheck_client(client: &Client<OpenAIConfig>, provider: &LlmProvider) -> Result<()> {
    client
        .models()
        .list()
        .await
        .with_context(|| format!("Failed to validate API key with {}", provider.name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    static UNCONFIGURED: LlmProvider = LlmProvider {
        name: "educlimb-test-unconfigured",
        base_url: "http://localhost/",
        default_model: "none",
        api_key_env: "EDUCLIMB_TEST_KEY_THAT_IS_NEVER_SET",
    };

    #[test]
    fn missing_credential_stops_before_the_form_opens() {
        let settings = Settings {
            provider: &UNCONFIGURED,
            model: "none".into(),
            temperature: 0.3,
        };
        let err = ensure_client(&settings).unwrap_err().to_string();
        assert!(err.contains("EDUCLIMB_TEST_KEY_THAT_IS_NEVER_SET"), "{err}");
        assert!(
            err.contains("educlimb key --set --provider educlimb-test-unconfigured"),
            "{err}"
        );
    }

    #[test]
    fn missing_key_error_names_env_var_and_command() {
        let settings = Settings::resolve(Some("openai"), None).unwrap();
        let message = missing_key_error(settings.provider).to_string();
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(message.contains("educlimb key --set --provider openai"));
    }
}
