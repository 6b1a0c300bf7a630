//! QaApiClient - REST client for the DocuBrain QA backend.
//!
//! Sends `POST <base-url>/api/chat` with `{ "message": ... }` and expects
//! `{ "reply": ..., "sources": [...] }` back.

use async_trait::async_trait;
use docubrain_core::config::{ApiConfig, DEFAULT_TIMEOUT_SECS};
use docubrain_core::error::{DocubrainError, Result};
use docubrain_core::qa::{ChatReply, ChatRequest, QaClient};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

const CHAT_PATH: &str = "/api/chat";

/// Client that talks to the QA backend over HTTP.
///
/// A missing base URL is accepted at construction; the first `ask` fails
/// with a configuration error instead.
#[derive(Clone)]
pub struct QaApiClient {
    client: Client,
    base_url: Option<String>,
    timeout: Duration,
}

impl QaApiClient {
    /// Creates a client for `base_url` with the default timeout.
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone()).with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> Result<String> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            DocubrainError::config("QA backend URL is not configured (set DOCUBRAIN_API_URL)")
        })?;
        Ok(format!("{}{}", base, CHAT_PATH))
    }

    async fn send_request(&self, body: &ChatRequest) -> Result<ChatReply> {
        let url = self.chat_url()?;
        debug!("POST {} ({} chars)", url, body.message.chars().count());

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| DocubrainError::transport(format!("QA request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read QA error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let text = response
            .text()
            .await
            .map_err(|err| DocubrainError::transport(format!("Failed to read QA response: {err}")))?;

        parse_reply(&text)
    }
}

#[async_trait]
impl QaClient for QaApiClient {
    async fn ask(&self, message: &str) -> Result<ChatReply> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        let result = self.send_request(&request).await;
        match &result {
            Ok(reply) => debug!("QA reply with {} source(s)", reply.sources.len()),
            Err(e) => error!("QA request failed: {}", e),
        }
        result
    }
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

fn parse_reply(body: &str) -> Result<ChatReply> {
    serde_json::from_str(body)
        .map_err(|err| DocubrainError::InvalidResponse(format!("Failed to parse QA response: {err}")))
}

fn map_http_error(status: StatusCode, body: String) -> DocubrainError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| match wrapper.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        })
        .unwrap_or(body);

    DocubrainError::http(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let client = QaApiClient::new(Some("https://qa.example.com/".to_string()));
        assert_eq!(client.chat_url().unwrap(), "https://qa.example.com/api/chat");
    }

    #[test]
    fn test_missing_base_url_is_config_error() {
        let client = QaApiClient::new(None);
        assert!(client.chat_url().unwrap_err().is_config());

        let blank = QaApiClient::new(Some("   ".to_string()));
        assert!(blank.base_url().is_none());
    }

    #[test]
    fn test_from_config_applies_timeout() {
        let client = QaApiClient::from_config(&ApiConfig {
            base_url: Some("http://localhost:8000".to_string()),
            timeout_secs: 3,
        });
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.base_url(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_parse_reply_rejects_wrong_shape() {
        let err = parse_reply(r#"{"answer": "X"}"#).unwrap_err();
        assert!(matches!(err, DocubrainError::InvalidResponse(_)));
    }

    #[test]
    fn test_map_http_error_uses_detail() {
        let err = map_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "Qdrant unavailable"}"#.to_string(),
        );
        assert_eq!(err, DocubrainError::http(500, "Qdrant unavailable"));
    }

    #[test]
    fn test_map_http_error_falls_back_to_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err, DocubrainError::http(502, "upstream down"));
    }

    #[tokio::test]
    async fn test_ask_without_base_url_fails() {
        let client = QaApiClient::new(None);
        let err = client.ask("hello").await.unwrap_err();
        assert!(err.is_config());
    }
}
