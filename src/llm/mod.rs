pub mod client;
pub mod feedback;
pub mod provider;
pub mod secrets;

pub use client::{LlmClient, ensure_client, test_configured_api_key};
pub use provider::{LLM_PROVIDERS, LlmProvider, find_provider};
pub use secrets::{ApiKeySource, clear_api_key, prompt_for_api_key, store_api_key};
