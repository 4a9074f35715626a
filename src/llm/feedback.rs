use anyhow::{Context, Result, anyhow};
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};

use super::LlmClient;

/// Sends the prompt as a single user message and returns the reply unchanged.
pub async fn request_feedback(client: &LlmClient, prompt: &str) -> Result<String> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(client.model.as_str())
        .temperature(client.temperature)
        .messages([ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?
            .into()])
        .build()?;

    let response = client
        .client
        .chat()
        .create(request)
        .await
        .with_context(|| format!("LLM request to {} failed", client.model))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("No content returned from model"))
}
