// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for storage entities.

use serde::{Deserialize, Serialize};

/// Owner key used for history rows when no user is signed in.
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// A single generation stored in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry identifier (UUID v4).
    pub id: String,
    /// The situation text the user submitted.
    pub user_input: String,
    /// Intensity mode the generation ran under.
    pub mode: String,
    /// Generated expression text.
    pub response: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// A locally cached subscription document, as stored.
///
/// `data` is the raw JSON of the subscription record; parsing (and the
/// treat-corruption-as-miss policy) happens in the identity crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSubscription {
    pub data: String,
    /// Fetch time in epoch milliseconds.
    pub cached_at: i64,
}

/// A canonical identity row minted by the bridge-login endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// Provider-namespaced identifier (e.g. `kakao:12345`).
    pub uid: String,
    /// Which sign-in flow created this identity.
    pub provider: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 timestamp of the most recent login.
    pub last_login: String,
}
