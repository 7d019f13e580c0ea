// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider client for the Ventio expression service.
//!
//! Wraps the chat-completions endpoint (expression generation) and the
//! speech endpoint (synthesis) behind [`OpenAiClient`], sharing one
//! credential and one retry policy.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse, SpeechRequest};
