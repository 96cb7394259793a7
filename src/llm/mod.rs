//! LLM integration for TalentScout.
//!
//! The intake flow only ever sees `Arc<dyn LlmProvider>`. The one concrete
//! backend is NVIDIA NIM, reached through its OpenAI-compatible
//! Chat Completions endpoint.

pub mod nim;
pub mod provider;

pub use nim::NimProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl From<&AppConfig> for LlmConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout: config.http_timeout,
        }
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: "nvidia_nim".to_string(),
            reason: format!("Failed to create HTTP client: {}", e),
        })?;

    tracing::info!(model = %config.model, base_url = %config.base_url, "Using NVIDIA NIM");
    Ok(Arc::new(NimProvider::new(
        client,
        config.base_url.clone(),
        config.api_key.clone(),
        config.model.clone(),
    )))
}
