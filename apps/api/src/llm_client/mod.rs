//! Completion client — the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion endpoint directly.
//! Requests are built by `resume::prompts` and sent through `CompletionService`.
//!
//! One call per request: no retry, no backoff. Every failure is surfaced as a
//! distinct `CompletionError` kind so callers can report it precisely.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CompletionSettings;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Completion endpoint returned an empty body")]
    EmptyReply,

    #[error("Completion response is not valid JSON: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("Completion response carried no message content")]
    MissingContent,
}

/// A fully-specified completion call. Built once per document, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The model's raw text answer plus token accounting when the provider sends it.
#[derive(Debug, Clone)]
pub struct CompletionReply {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// `choices[0].message.content`, the only part of the envelope we consume.
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Anything that can turn a `CompletionRequest` into a reply.
///
/// Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionReply, CompletionError>;
}

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    settings: CompletionSettings,
}

impl CompletionClient {
    /// No explicit timeout: the transport default applies.
    pub fn new(settings: CompletionSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait]
impl CompletionService for CompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionReply, CompletionError> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Completion API returned {}: {}", status, text);
            let message = serde_json::from_str::<ProviderError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Completion API response: {}", text);

        if text.trim().is_empty() {
            return Err(CompletionError::EmptyReply);
        }

        let envelope: ChatResponse =
            serde_json::from_str(&text).map_err(CompletionError::InvalidEnvelope)?;

        if let Some(usage) = &envelope.usage {
            debug!(
                "Completion call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let usage = envelope.usage.clone();
        let content = envelope
            .into_content()
            .ok_or(CompletionError::MissingContent)?;

        Ok(CompletionReply { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const PATH: &str = "/openai/v1/chat/completions";

    fn settings(url: String) -> CompletionSettings {
        CompletionSettings {
            api_key: "test-key".to_string(),
            api_url: url,
            model: "test-model".to_string(),
            temperature: 0.3,
            max_tokens: 1200,
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            system: "You are an expert resume parser.".to_string(),
            user: "Here is a resume".to_string(),
            temperature: 0.3,
            max_tokens: 1200,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "You are an expert resume parser."},
                    {"role": "user", "content": "Here is a resume"}
                ],
                "max_tokens": 1200
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "```json\n{}\n```"}}],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 4}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = CompletionClient::new(settings(format!("{}{PATH}", server.url())));
        let reply = client.complete(&request()).await.unwrap();

        assert_eq!(reply.content, "```json\n{}\n```");
        assert_eq!(reply.usage.unwrap().completion_tokens, 4);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_carries_provider_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#)
            .create_async()
            .await;

        let client = CompletionClient::new(settings(format!("{}{PATH}", server.url())));
        match client.complete(&request()).await {
            Err(CompletionError::Status { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(503)
            .with_body("upstream unavailable")
            .expect(1)
            .create_async()
            .await;

        let client = CompletionClient::new(settings(format!("{}{PATH}", server.url())));
        let err = client.complete(&request()).await.unwrap_err();

        assert!(matches!(err, CompletionError::Status { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_reply() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client = CompletionClient::new(settings(format!("{}{PATH}", server.url())));
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyReply));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_envelope() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = CompletionClient::new(settings(format!("{}{PATH}", server.url())));
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidEnvelope(_)));
    }

    #[tokio::test]
    async fn test_missing_choices_is_missing_content() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = CompletionClient::new(settings(format!("{}{PATH}", server.url())));
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingContent));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = CompletionClient::new(settings(
            "http://127.0.0.1:1/openai/v1/chat/completions".to_string(),
        ));
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }
}
