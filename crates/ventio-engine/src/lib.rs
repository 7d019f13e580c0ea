// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation orchestrator for the Ventio expression service.
//!
//! Turns a (situation, intensity-mode) pair into generated text and a
//! (text, voice) pair into synthesized audio, enforcing access policy and
//! daily usage accounting before every dispatch, and recording successful
//! generations into per-owner history.

pub mod backend;
pub mod engine;
pub mod error;

pub use backend::BackendClient;
pub use engine::Engine;
pub use error::EngineError;
