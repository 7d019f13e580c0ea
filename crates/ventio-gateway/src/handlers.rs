// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.
//!
//! Handles POST /api/generate, POST /api/tts, POST /api/auth/kakao, and
//! GET /health. Input validation rejects before any upstream call; upstream
//! failures pass their status through with the upstream message.

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use ventio_core::{VentioError, Voice};
use ventio_openai::ChatMessage;

use crate::minter::ProfileFields;
use crate::prompt;
use crate::server::AppState;

/// Request body for POST /api/generate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The situation text.
    #[serde(default)]
    pub user_input: Option<String>,
    /// Requested intensity mode.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Response body for POST /api/generate.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Generated expression text.
    pub response: String,
}

/// Request body for POST /api/tts.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    /// Text to synthesize.
    #[serde(default)]
    pub text: Option<String>,
    /// Voice to synthesize with; defaults to the neutral voice.
    #[serde(default)]
    pub voice: Option<Voice>,
}

/// Platform account id on the wire -- accepted as a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KakaoId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for KakaoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KakaoId::Number(n) => write!(f, "{n}"),
            KakaoId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Request body for POST /api/auth/kakao.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoLoginRequest {
    /// Platform-issued access token, forwarded by the client.
    #[serde(default)]
    pub kakao_access_token: Option<String>,
    /// Platform account identifier.
    #[serde(default)]
    pub kakao_id: Option<KakaoId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// Response body for POST /api/auth/kakao.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoLoginResponse {
    /// Signed custom credential for the identity provider.
    pub custom_token: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Pass an upstream failure through with its status and message.
fn upstream_error(e: VentioError) -> Response {
    error!(error = %e, "upstream call failed");
    let status = e
        .upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match e {
        VentioError::Provider { message, .. } => message,
        other => other.to_string(),
    };
    error_response(status, &message)
}

/// Treat absent and empty strings alike, matching the contract's
/// "missing field" semantics.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// POST /api/generate
///
/// Builds the mode-styled prompt and requests a short completion.
pub async fn post_generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "generate request body rejected");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let (user_input, mode) = match (non_empty(body.user_input), non_empty(body.mode)) {
        (Some(user_input), Some(mode)) => (user_input, mode),
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing required fields"),
    };

    let Some(openai) = &state.openai else {
        error!("generate requested but no upstream API key is configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: API key is missing",
        );
    };

    let prompt_text = prompt::build_prompt(&user_input, &mode);
    let request = openai.chat_request(vec![
        ChatMessage::system(prompt::SYSTEM_PROMPT),
        ChatMessage::user(prompt_text),
    ]);

    match openai.chat_completion(&request).await {
        Ok(completion) => match completion.first_text() {
            Some(text) => {
                debug!(mode, "generation succeeded");
                (
                    StatusCode::OK,
                    Json(GenerateResponse {
                        response: text.to_string(),
                    }),
                )
                    .into_response()
            }
            None => {
                error!("completion contained no choices");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate response",
                )
            }
        },
        Err(e) => upstream_error(e),
    }
}

/// POST /api/tts
///
/// Synthesizes speech and returns raw audio bytes.
pub async fn post_tts(
    State(state): State<AppState>,
    body: Result<Json<TtsRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "tts request body rejected");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let Some(text) = non_empty(body.text) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required text field");
    };
    let voice = body.voice.unwrap_or_default();

    let Some(openai) = &state.openai else {
        error!("tts requested but no upstream API key is configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: API key is missing",
        );
    };

    let request = openai.speech_request(text, voice);
    match openai.speech(&request).await {
        Ok(bytes) => {
            debug!(%voice, bytes = bytes.len(), "speech synthesis succeeded");
            ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response()
        }
        Err(e) => upstream_error(e),
    }
}

/// POST /api/auth/kakao
///
/// Exchanges a platform identity for a signed custom credential, creating
/// the canonical identity on first login.
pub async fn post_kakao_login(
    State(state): State<AppState>,
    body: Result<Json<KakaoLoginRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            error!(error = %rejection, "bridge login body rejected");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "인증 처리 중 오류가 발생했습니다.",
            );
        }
    };

    let Some(kakao_id) = body.kakao_id else {
        return error_response(StatusCode::BAD_REQUEST, "카카오 ID가 필요합니다.");
    };
    debug!(
        has_access_token = body.kakao_access_token.is_some(),
        "bridge login request"
    );

    let Some(admin) = &state.admin else {
        error!("bridge login requested but identity credentials are not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "인증 처리 중 오류가 발생했습니다.",
        );
    };

    let uid = format!("kakao:{kakao_id}");
    let profile = ProfileFields {
        email: body.email,
        display_name: body.display_name,
        photo_url: body.photo_url,
    };

    let minted = async {
        admin.ensure_user(&uid, "kakao", &profile).await?;
        admin.mint_custom_token(&uid, "kakao").await
    }
    .await;

    match minted {
        Ok(custom_token) => (
            StatusCode::OK,
            Json(KakaoLoginResponse { custom_token }),
        )
            .into_response(),
        Err(e) => {
            error!(%uid, error = %e, "bridge login failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "인증 처리 중 오류가 발생했습니다.",
            )
        }
    }
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
