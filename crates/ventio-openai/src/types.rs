// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completion and speech request/response types.

use serde::{Deserialize, Serialize};
use ventio_core::Voice;

// --- Chat completion types ---

/// A request to the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,

    /// Conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature.
    pub temperature: f64,

    /// Token ceiling for the completion.
    pub max_tokens: u32,
}

/// A single message in the chat format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A full response from the chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response identifier.
    pub id: String,
    /// Model that generated the response.
    pub model: String,
    /// Completion choices; the first is the one used.
    pub choices: Vec<ChatChoice>,
    /// Token usage statistics, when reported.
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text content of the first choice, if present.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
    }
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Position of this choice.
    pub index: u32,
    /// The generated message.
    pub message: ChatMessage,
    /// Reason the generation stopped.
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// --- Speech types ---

/// A request to the speech endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    /// Model identifier (e.g., "tts-1").
    pub model: String,
    /// Text to synthesize.
    pub input: String,
    /// Voice to synthesize with.
    pub voice: Voice,
}

// --- Error types ---

/// API error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorDetail,
}

/// Error detail within an API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub message: String,
    /// Error type identifier.
    #[serde(rename = "type")]
    pub type_: Option<String>,
}
