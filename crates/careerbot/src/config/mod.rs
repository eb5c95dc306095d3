//! Configuration loading
//!
//! A TOML file with `[model]` and `[chat]` sections; every field has a
//! default, so a missing file or section is not an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{CareerBotError, Result};

/// Main configuration structure for careerbot
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Remote model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Conversation configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration from an explicit path, or the first default location that exists
    ///
    /// Falls back to `Config::default()` when no file is found.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for path in default_config_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CareerBotError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| CareerBotError::Config(format!("Failed to parse config: {e}")))
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".careerbot").join("config.toml")),
        dirs::config_dir().map(|c| c.join("careerbot").join("config.toml")),
        Some(PathBuf::from("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Which wire format the remote model speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Generative Language API (`generateContent`)
    #[default]
    Gemini,
    /// Any OpenAI-compatible `/chat/completions` endpoint
    OpenAI,
}

/// Remote model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Provider wire format
    #[serde(default)]
    pub provider: ProviderKind,
    /// API base URL (provider-specific paths are appended)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable name for API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Sampling temperature passed through to the provider
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_url: default_api_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            timeout_secs: None,
            temperature: None,
        }
    }
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

/// Conversation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Session key the front ends use when none is given on the command line
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_id: default_session_id(),
        }
    }
}

fn default_session_id() -> String {
    "default".to_string()
}
