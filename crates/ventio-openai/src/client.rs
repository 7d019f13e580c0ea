// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat-completion and speech APIs.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, and transient error retry. One credential serves both
//! endpoints.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};
use ventio_config::model::OpenAiConfig;
use ventio_core::VentioError;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse, SpeechRequest};

/// Default base URL for the OpenAI API.
const API_BASE_URL: &str = "https://api.openai.com/v1";

/// HTTP client for OpenAI API communication.
///
/// Manages the bearer authentication header, connection pooling, and retry
/// logic for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    chat_model: String,
    tts_model: String,
    temperature: f64,
    max_tokens: u32,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client from configuration.
    ///
    /// # API Key Resolution
    /// 1. `config.openai.api_key` if set
    /// 2. `OPENAI_API_KEY` environment variable
    /// 3. Returns a configuration error if neither is available
    pub fn new(config: &OpenAiConfig) -> Result<Self, VentioError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                VentioError::Config(
                    "OpenAI API key not set (openai.api_key or OPENAI_API_KEY)".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| VentioError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| VentioError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config
                .api_base
                .clone()
                .unwrap_or_else(|| API_BASE_URL.to_string()),
            chat_model: config.chat_model.clone(),
            tts_model: config.tts_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: 1,
        })
    }

    /// The configured chat model identifier.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Build a chat request with the configured model and sampling settings.
    pub fn chat_request(&self, messages: Vec<crate::types::ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.chat_model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Build a speech request with the configured model.
    pub fn speech_request(
        &self,
        input: impl Into<String>,
        voice: ventio_core::Voice,
    ) -> SpeechRequest {
        SpeechRequest {
            model: self.tts_model.clone(),
            input: input.into(),
            voice,
        }
    }

    /// Sends a chat completion request and returns the full response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, VentioError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying chat request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| VentioError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    status: None,
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "chat response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| VentioError::Provider {
                    message: format!("failed to read response body: {e}"),
                    status: None,
                    source: Some(Box::new(e)),
                })?;
                let chat_response: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| VentioError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        status: None,
                        source: Some(Box::new(e)),
                    })?;
                return Ok(chat_response);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(extract_api_error(status, &body));
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(extract_api_error(status, &body));
        }

        Err(last_error.unwrap_or_else(|| VentioError::Provider {
            message: "chat request failed after retries".into(),
            status: None,
            source: None,
        }))
    }

    /// Sends a speech synthesis request and returns the raw audio bytes.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn speech(&self, request: &SpeechRequest) -> Result<Vec<u8>, VentioError> {
        let url = format!("{}/audio/speech", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying speech request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| VentioError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    status: None,
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "speech response received");

            if status.is_success() {
                let bytes = response.bytes().await.map_err(|e| VentioError::Provider {
                    message: format!("failed to read audio body: {e}"),
                    status: None,
                    source: Some(Box::new(e)),
                })?;
                return Ok(bytes.to_vec());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(extract_api_error(status, &body));
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(extract_api_error(status, &body));
        }

        Err(last_error.unwrap_or_else(|| VentioError::Provider {
            message: "speech request failed after retries".into(),
            status: None,
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

/// Build a provider error from an upstream failure body.
///
/// Prefers the structured `{"error": {"message": ...}}` shape; falls back to
/// the raw body text when the upstream error is unstructured.
fn extract_api_error(status: reqwest::StatusCode, body: &str) -> VentioError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!("OpenAI API error: {}", api_err.error.message),
        Err(_) => format!("API returned {status}: {body}"),
    };
    VentioError::Provider {
        message,
        status: Some(status.as_u16()),
        source: None,
    }
}
