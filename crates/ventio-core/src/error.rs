// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ventio expression service.

use thiserror::Error;

/// The primary error type used across Ventio crates.
#[derive(Debug, Error)]
pub enum VentioError {
    /// Configuration errors (invalid TOML, missing required fields, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Upstream service errors (completion API, speech API). Carries the
    /// upstream HTTP status where one was observed so callers can pass it
    /// through unchanged.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Identity errors (sign-in failure, token minting, platform SDK).
    #[error("auth error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VentioError {
    /// Build a provider error from an upstream message and status.
    pub fn provider(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Provider {
            message: message.into(),
            status,
            source: None,
        }
    }

    /// The upstream HTTP status attached to this error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }
}
