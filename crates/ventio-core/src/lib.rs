// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ventio expression service.
//!
//! Provides the shared error type and the domain types (intensity modes,
//! metered features, subscriptions, user sessions) used across the
//! workspace. Policy logic, persistence, and service wiring live in the
//! downstream crates.

pub mod error;
pub mod types;

pub use error::VentioError;
pub use types::{Feature, Mode, Plan, ProviderKind, Subscription, UserSession, Voice};
