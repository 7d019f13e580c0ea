// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Ventio expression service.
//!
//! Exposes the three backend endpoints the client engine consumes:
//! `POST /api/generate` (mode-styled expression generation),
//! `POST /api/tts` (speech synthesis), and `POST /api/auth/kakao`
//! (platform-token to custom-credential exchange).

pub mod handlers;
pub mod minter;
pub mod prompt;
pub mod server;

pub use minter::{IdentityAdmin, ProfileFields, SqliteIdentityAdmin};
pub use server::{start_server, AppState, ServerConfig};
