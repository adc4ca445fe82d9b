//! Remote Rewrite Service
//!
//! OpenAI-compatible chat-completion call against the Hugging Face router.
//! One stateless request per rewrite; no retries and no explicit timeout.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{FallbackReason, RewriteProvider, ToneRequest};
use crate::config::Config;
use crate::tone::Tone;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("empty response")]
    Empty,
}

impl RemoteError {
    pub fn fallback_reason(&self) -> FallbackReason {
        match self {
            RemoteError::Status { status, .. } => FallbackReason::Status(*status),
            RemoteError::Transport(_) => FallbackReason::Network,
            RemoteError::Malformed(_) => FallbackReason::Malformed,
            RemoteError::Empty => FallbackReason::Empty,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Instruction sent as the system turn
pub fn system_prompt(tone: Tone) -> String {
    [
        "You rewrite user text.".to_string(),
        format!("Tone: {tone}."),
        "Keep meaning, facts, numbers, URLs, and line breaks.".to_string(),
        "Fix grammar and clarity; make it sound professional when requested.".to_string(),
        "Return only the rewritten text. No quotes or extra commentary.".to_string(),
    ]
    .join(" ")
}

/// Chat-completion client
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl ChatClient {
    /// Create new client from config
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl RewriteProvider for ChatClient {
    async fn complete(&self, api_key: &str, request: &ToneRequest) -> Result<String, RemoteError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system_prompt(request.tone) },
                    { "role": "user", "content": request.text }
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            warn!("Rewrite service error ({}): {}", status, body_text);
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        debug!("Rewrite service raw body: {}", body_text);

        let parsed: ChatResponse = serde_json::from_str(&body_text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(RemoteError::Empty)
    }

    fn name(&self) -> &str {
        "hf-router"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(&Config {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            ..Config::default()
        })
    }

    fn request() -> ToneRequest {
        ToneRequest::new("hey can u send it", Tone::Friendly)
    }

    #[test]
    fn test_system_prompt_mentions_tone() {
        let prompt = system_prompt(Tone::Concise);
        assert!(prompt.contains("Tone: concise."));
        assert!(prompt.contains("URLs, and line breaks"));
        assert!(prompt.ends_with("No quotes or extra commentary."));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_partial_json(serde_json::json!({
                "model": "openai/gpt-oss-20b:fireworks-ai",
                "max_tokens": 256,
                "messages": [
                    { "role": "system", "content": system_prompt(Tone::Friendly) },
                    { "role": "user", "content": "hey can u send it" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Hey, could you send it?\n" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let text = client.complete("hf_test", &request()).await.unwrap();
        assert_eq!(text, "Hey, could you send it?");
    }

    #[tokio::test]
    async fn test_complete_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.complete("hf_test", &request()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 429, .. }));
        assert_eq!(err.fallback_reason(), FallbackReason::Status(429));
    }

    #[tokio::test]
    async fn test_complete_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "   " } }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.complete("hf_test", &request()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Empty));
    }

    #[tokio::test]
    async fn test_complete_missing_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "x" })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.complete("hf_test", &request()).await.unwrap_err();
        assert_eq!(err.fallback_reason(), FallbackReason::Empty);
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.complete("hf_test", &request()).await.unwrap_err();
        assert_eq!(err.fallback_reason(), FallbackReason::Malformed);
    }

    #[tokio::test]
    async fn test_complete_unreachable() {
        let client = ChatClient::new(&Config {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ..Config::default()
        });
        let err = client.complete("hf_test", &request()).await.unwrap_err();
        assert_eq!(err.fallback_reason(), FallbackReason::Network);
    }
}
