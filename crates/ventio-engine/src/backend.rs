// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the service's own backend endpoints.
//!
//! Failure bodies are heterogeneous: the backend answers JSON
//! `{"error": ...}` on its own failures but may relay raw upstream text.
//! Both shapes normalize into [`EngineError::Backend`] here, so nothing
//! duck-typed travels further inward.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ventio_core::{VentioError, Voice};

use crate::error::EngineError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    user_input: &'a str,
    mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    voice: Voice,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the generation and speech endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Client against the service at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, VentioError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| VentioError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Request expression generation. Returns the generated text.
    pub async fn generate(&self, user_input: &str, mode: &str) -> Result<String, EngineError> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest { user_input, mode })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(normalize_failure(
                status.as_u16(),
                &body,
                "응답 생성 중 오류가 발생했습니다.",
            ));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "generate response parse failed");
            EngineError::Backend {
                message: "응답 생성 중 오류가 발생했습니다.".to_string(),
                status: None,
            }
        })?;

        // A 200 body can still carry an error field.
        if let Some(error) = body.error {
            return Err(EngineError::Backend {
                message: error,
                status: None,
            });
        }
        let text = body.response.ok_or_else(|| EngineError::Backend {
            message: "응답 생성 중 오류가 발생했습니다.".to_string(),
            status: None,
        })?;
        debug!(mode, "generation dispatched");
        Ok(text)
    }

    /// Request speech synthesis. Returns the raw audio bytes.
    pub async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, EngineError> {
        let url = format!("{}/api/tts", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&TtsRequest { text, voice })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(normalize_failure(status.as_u16(), &body, "TTS 생성 실패"));
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(error = %e, "tts body read failed");
            EngineError::Backend {
                message: "TTS 생성 실패".to_string(),
                status: None,
            }
        })?;
        debug!(%voice, bytes = bytes.len(), "synthesis dispatched");
        Ok(bytes.to_vec())
    }
}

fn transport_error(e: reqwest::Error) -> EngineError {
    warn!(error = %e, "backend request failed");
    EngineError::Backend {
        message: format!("backend request failed: {e}"),
        status: None,
    }
}

/// Extract the backend's error message: structured JSON first, raw body
/// text second, fixed fallback last.
fn normalize_failure(status: u16, body: &str, fallback: &str) -> EngineError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                fallback.to_string()
            } else {
                body.to_string()
            }
        });
    EngineError::Backend {
        message,
        status: Some(status),
    }
}
