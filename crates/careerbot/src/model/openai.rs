//! OpenAI-compatible chat completions
//!
//! Works with any endpoint exposing `POST {api_url}/chat/completions` with
//! Bearer authentication.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chat::Prompt;
use crate::config::ModelConfig;
use crate::model::{ApiKey, ChatModel, ModelError, api_error, base_url, http_client};

/// Chat model backed by an OpenAI-compatible API
#[derive(Debug)]
pub struct OpenAiModel {
    client: Client,
    url: String,
    model: String,
    api_key: ApiKey,
    temperature: Option<f32>,
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiModel {
    pub fn new(config: &ModelConfig, api_key: ApiKey) -> Result<Self, ModelError> {
        let url = format!("{}/chat/completions", base_url(config)?);
        let client = http_client(config)?;

        info!(
            "OpenAiModel initialized with model: {}, api_url: {}",
            config.model, config.api_url
        );

        Ok(Self {
            client,
            url,
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(prompt.history.len() + 2);
        messages.push(Message {
            role: "system",
            content: &prompt.system,
        });
        messages.extend(prompt.history.iter().map(|turn| Message {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(Message {
            role: "user",
            content: &prompt.user,
        });

        ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let request = self.build_request(prompt);
        debug!("Calling chat completions at: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ModelError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
