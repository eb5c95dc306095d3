//! Remote text-generation models
//!
//! A [`ChatModel`] turns an assembled [`Prompt`] into the provider's wire
//! format, performs a single blocking request/response exchange, and returns
//! the reply text. There is no retry or backoff: a failed call surfaces
//! immediately so the chat loop can report it.

pub mod credential;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::chat::Prompt;
use crate::config::{ModelConfig, ProviderKind};

pub use credential::{ApiKey, load_env_file, resolve_api_key};
pub use gemini::GeminiModel;
pub use openai::OpenAiModel;

/// Trait for remote chat models
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the prompt and return the model's reply text
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Model call failures
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Model returned an empty response")]
    EmptyResponse,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Build the configured provider
pub fn build_model(
    config: &ModelConfig,
    api_key: ApiKey,
) -> Result<Box<dyn ChatModel>, ModelError> {
    let model: Box<dyn ChatModel> = match config.provider {
        ProviderKind::Gemini => Box::new(GeminiModel::new(config, api_key)?),
        ProviderKind::OpenAI => Box::new(OpenAiModel::new(config, api_key)?),
    };
    Ok(model)
}

/// Shared reqwest client construction honoring the optional timeout
fn http_client(config: &ModelConfig) -> Result<reqwest::Client, ModelError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ModelError::Config(e.to_string()))
}

/// Validate the configured base URL and strip any trailing slash
fn base_url(config: &ModelConfig) -> Result<String, ModelError> {
    url::Url::parse(&config.api_url)
        .map_err(|e| ModelError::Config(format!("Invalid api_url '{}': {e}", config.api_url)))?;
    Ok(config.api_url.trim_end_matches('/').to_string())
}

/// Turn a non-success response into an [`ModelError::Api`]
async fn api_error(response: reqwest::Response) -> ModelError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ModelError::Api(format!("API returned {status}: {error_text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[test]
    fn test_build_model_selects_provider() {
        let gemini = build_model(&ModelConfig::default(), key()).unwrap();
        assert_eq!(gemini.name(), "gemini");

        let config = ModelConfig {
            provider: ProviderKind::OpenAI,
            api_url: "https://api.openai.com/v1".to_string(),
            ..ModelConfig::default()
        };
        let openai = build_model(&config, key()).unwrap();
        assert_eq!(openai.name(), "openai");
    }

    #[test]
    fn test_build_model_rejects_bad_url() {
        let config = ModelConfig {
            api_url: "not a url".to_string(),
            ..ModelConfig::default()
        };
        let err = build_model(&config, key()).err().unwrap();
        assert!(matches!(err, ModelError::Config(_)));
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = ModelConfig {
            api_url: "https://example.com/v1/".to_string(),
            ..ModelConfig::default()
        };
        assert_eq!(base_url(&config).unwrap(), "https://example.com/v1");
    }
}
