//! Google Generative Language API (`generateContent`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chat::{Prompt, Role};
use crate::config::ModelConfig;
use crate::model::{ApiKey, ChatModel, ModelError, api_error, base_url, http_client};

/// Gemini chat model
#[derive(Debug)]
pub struct GeminiModel {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: &str) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiModel {
    pub fn new(config: &ModelConfig, api_key: ApiKey) -> Result<Self, ModelError> {
        let endpoint = format!("{}/models/{}:generateContent", base_url(config)?, config.model);
        let client = http_client(config)?;

        info!("GeminiModel initialized with model: {}", config.model);

        Ok(Self {
            client,
            endpoint,
            api_key,
            temperature: config.temperature,
        })
    }

    fn build_request(&self, prompt: &Prompt) -> GenerateContentRequest {
        let mut contents: Vec<Content> = prompt
            .history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                Content::text(Some(role), &turn.content)
            })
            .collect();
        contents.push(Content::text(Some("user"), &prompt.user));

        GenerateContentRequest {
            system_instruction: Content::text(None, &prompt.system),
            contents,
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let request = self.build_request(prompt);
        debug!("Calling Gemini at: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;

        if body.candidates.is_empty() {
            if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(ModelError::Api(format!("Prompt blocked: {reason}")));
            }
            return Err(ModelError::EmptyResponse);
        }

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Turn, assemble};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config(api_url: String) -> ModelConfig {
        ModelConfig {
            api_url,
            model: "gemini-1.5-flash".to_string(),
            ..ModelConfig::default()
        }
    }

    fn create_model(api_url: String) -> GeminiModel {
        GeminiModel::new(&create_test_config(api_url), ApiKey::new("test-key").unwrap()).unwrap()
    }

    fn reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                }
            }]
        })
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("Learn Python.")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Computer Science", "What should I learn?", "{}", &[]);

        let text = model.generate(&prompt).await.unwrap();
        assert_eq!(text, "Learn Python.");
    }

    #[tokio::test]
    async fn test_request_carries_system_history_and_question() {
        let mock_server = MockServer::start().await;

        let history = vec![Turn::user("Hi"), Turn::assistant("Hello!")];
        let prompt = assemble("Biology", "Lab jobs?", "{}", &history);

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": { "parts": [{ "text": prompt.system.clone() }] },
                "contents": [
                    { "role": "user", "parts": [{ "text": "Hi" }] },
                    { "role": "model", "parts": [{ "text": "Hello!" }] },
                    { "role": "user", "parts": [{ "text": "Major: Biology\nInput: Lab jobs?" }] }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("Try research labs.")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        assert_eq!(model.generate(&prompt).await.unwrap(), "Try research labs.");
    }

    #[tokio::test]
    async fn test_temperature_is_sent_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "temperature": 0.5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ModelConfig {
            temperature: Some(0.5),
            ..create_test_config(mock_server.uri())
        };
        let model = GeminiModel::new(&config, ApiKey::new("k").unwrap()).unwrap();
        let prompt = assemble("Business", "?", "{}", &[]);
        assert_eq!(model.generate(&prompt).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);

        let err = model.generate(&prompt).await.unwrap_err();
        assert!(matches!(err, ModelError::Api(_)));
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_quota_exceeded_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);
        let err = model.generate(&prompt).await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);
        let err = model.generate(&prompt).await.unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);
        let err = model.generate(&prompt).await.unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_blocked_prompt_reports_reason() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);
        let err = model.generate(&prompt).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_multi_part_reply_is_joined() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Learn " }, { "text": "SQL." }] }
                }]
            })))
            .mount(&mock_server)
            .await;

        let model = create_model(mock_server.uri());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);
        assert_eq!(model.generate(&prompt).await.unwrap(), "Learn SQL.");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on port 9 on loopback
        let model = create_model("http://127.0.0.1:9".to_string());
        let prompt = assemble("Business", "Jobs?", "{}", &[]);
        let err = model.generate(&prompt).await.unwrap_err();
        assert!(matches!(err, ModelError::Request(_)));
    }

    #[test]
    fn test_name() {
        let model = create_model("https://example.com".to_string());
        assert_eq!(model.name(), "gemini");
    }
}
