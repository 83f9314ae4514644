//! Anthropic service for answer generation.
//!
//! Minimal, non-streaming client around the Messages API. The endpoint is
//! derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/messages: one user message, bounded `max_tokens`
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Anthropic`
//! - `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::Instant;

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// API version header value expected by the Messages API.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Thin client for the Anthropic Messages API.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + auth/default headers).
#[derive(Debug)]
pub struct AnthropicService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_messages: String,
}

impl AnthropicService {
    /// Creates a new [`AnthropicService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Anthropic
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is blank
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Anthropic {
            return Err(
                ProviderError::new(Provider::Anthropic, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        if cfg.api_key.trim().is_empty() {
            return Err(
                ProviderError::new(Provider::Anthropic, ProviderErrorKind::MissingApiKey).into(),
            );
        }

        let base = cfg.base_url().to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ProviderError::new(
                Provider::Anthropic,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            header::HeaderValue::from_str(cfg.api_key.trim()).map_err(|e| {
                ProviderError::new(
                    Provider::Anthropic,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .default_headers(headers)
            .build()?;

        let url_messages = format!("{base}/v1/messages");

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            max_tokens = cfg.max_tokens,
            timeout_secs = cfg.timeout().as_secs(),
            "AnthropicService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_messages,
        })
    }

    /// Model identifier this client sends.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs one **non-streaming** Messages call with a single user message.
    ///
    /// Returns the first text segment of the reply.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyContent` if no text block is returned
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = MessagesRequest::from_cfg(&self.cfg, prompt);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            max_tokens = self.cfg.max_tokens,
            "POST {}", self.url_messages
        );

        let resp = self
            .client
            .post(&self.url_messages)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_messages.clone();
            let text = resp.text().await.unwrap_or_default();
            // Prefer the structured error message when the body carries one.
            let detail = serde_json::from_str::<MessagesErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            let snippet = make_snippet(&detail);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Anthropic /v1/messages returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Anthropic,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: MessagesResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /v1/messages response"
                );
                return Err(ProviderError::new(
                    Provider::Anthropic,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `content[0].text`"
                    )),
                )
                .into());
            }
        };

        let text = out
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::new(Provider::Anthropic, ProviderErrorKind::EmptyContent))?;

        info!(
            model = %self.cfg.model,
            answer_len = text.len(),
            latency_ms = started.elapsed().as_millis(),
            "messages call completed"
        );

        Ok(text)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/messages` (non-streaming).
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> MessagesRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            max_tokens: cfg.max_tokens,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
            temperature: cfg.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/v1/messages`.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// Content block; only `text` blocks carry a `text` field.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesErrorResponse {
    error: MessagesErrorDetail,
}

#[derive(Debug, Deserialize)]
struct MessagesErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Anthropic,
            model: "claude-sonnet-4-20250514".into(),
            endpoint: endpoint.into(),
            api_key: "sk-ant-test".into(),
            max_tokens: 2048,
            temperature: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn sends_single_user_message_and_returns_first_text() {
        let seen: Arc<Mutex<Option<(HeaderMap, Value)>>> = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let app = Router::new().route(
            "/v1/messages",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some((headers, body));
                    Json(json!({
                        "id": "msg_1",
                        "content": [
                            { "type": "text", "text": "The pipeline is..." },
                            { "type": "text", "text": "ignored" }
                        ]
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let svc = AnthropicService::new(cfg(&base)).unwrap();
        let out = svc.generate("Question: what?").await.unwrap();
        assert_eq!(out, "The pipeline is...");

        let (headers, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(headers["x-api-key"], "sk-ant-test");
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Question: what?");
        assert!(body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_message() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "type": "error",
                        "error": { "type": "authentication_error", "message": "invalid x-api-key" }
                    })),
                )
            }),
        );
        let base = serve(app).await;

        let svc = AnthropicService::new(cfg(&base)).unwrap();
        let err = svc.generate("hi").await.unwrap_err();
        match err {
            AiLlmError::Provider(p) => {
                assert_eq!(p.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
                assert!(p.to_string().contains("invalid x-api-key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reply_without_text_is_empty_content() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async { Json(json!({ "content": [ { "type": "tool_use", "id": "t" } ] })) }),
        );
        let base = serve(app).await;

        let svc = AnthropicService::new(cfg(&base)).unwrap();
        let err = svc.generate("hi").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyContent,
                ..
            })
        ));
    }

    #[test]
    fn constructor_validates_config() {
        let mut wrong = cfg("https://api.anthropic.com");
        wrong.provider = LlmProvider::OpenAI;
        assert!(AnthropicService::new(wrong).is_err());

        let mut keyless = cfg("https://api.anthropic.com");
        keyless.api_key = " ".into();
        assert!(AnthropicService::new(keyless).is_err());

        assert!(AnthropicService::new(cfg("api.anthropic.com")).is_err());
    }
}
