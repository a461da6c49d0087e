//! Cortex completion client.
//!
//! `POST {base}/api/v2/cortex/inference:complete` with `stream=false`.
//! The prompt travels as a single user message; the answer is read from
//! `choices[0].message.content` (or the older `choices[0].messages`).

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error_handler::{Result, UpstreamError};
use crate::services::transport::PlatformHttp;

/// Thin client for the completion endpoint.
#[derive(Clone)]
pub struct CompleteService {
    http: PlatformHttp,
}

impl CompleteService {
    pub fn new(http: PlatformHttp) -> Self {
        Self { http }
    }

    /// Performs a **non-streaming** completion.
    ///
    /// # Errors
    /// - [`UpstreamError::HttpStatus`] for non-2xx responses
    /// - [`UpstreamError::Decode`] if no choice carries text
    #[instrument(skip_all, fields(model = %model, prompt_chars = prompt.chars().count()))]
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let url = self.http.url("/api/v2/cortex/inference:complete");
        let body = CompleteRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let out: CompleteResponse = self.http.post_json(&url, &body).await?;
        let text = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.map(|m| m.content).or(c.messages))
            .ok_or_else(|| UpstreamError::Decode("completion returned no choices".into()))?;

        debug!(answer_chars = text.chars().count(), "completion finished");
        Ok(text)
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct CompleteRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompleteResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<OutMessage>,
    /// Older response shape: the text directly under `messages`.
    #[serde(default)]
    messages: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::CortexError;
    use crate::services::test_support::config_for;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_with(body: serde_json::Value) -> (MockServer, CompleteService) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/cortex/inference:complete"))
            .and(body_partial_json(json!({"model": "mistral-large", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        let svc = CompleteService::new(PlatformHttp::new(config_for(&server.uri())).unwrap());
        (server, svc)
    }

    #[tokio::test]
    async fn reads_message_content() {
        let (_server, svc) = service_with(json!({
            "choices": [{"message": {"content": "Arctic-Embed is an embedding model."}}]
        }))
        .await;
        let out = svc.complete("mistral-large", "prompt").await.unwrap();
        assert_eq!(out, "Arctic-Embed is an embedding model.");
    }

    #[tokio::test]
    async fn reads_legacy_messages_field() {
        let (_server, svc) = service_with(json!({"choices": [{"messages": "legacy"}]})).await;
        assert_eq!(svc.complete("mistral-large", "p").await.unwrap(), "legacy");
    }

    #[tokio::test]
    async fn empty_choices_is_decode_error() {
        let (_server, svc) = service_with(json!({"choices": []})).await;
        let err = svc.complete("mistral-large", "p").await.unwrap_err();
        assert!(matches!(err, CortexError::Upstream(UpstreamError::Decode(_))));
    }
}
