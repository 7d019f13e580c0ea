// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared domain types: intensity modes, metered features, subscriptions,
//! and the in-memory user session.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Intensity mode requested for expression generation.
///
/// The three tiers are ordered by access requirements: `light` is open to
/// everyone, `hard` requires a signed-in user, `very_hard` requires an
/// active premium subscription.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Light,
    Hard,
    VeryHard,
}

/// A metered feature with a daily usage limit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Text generation calls.
    Gpt,
    /// Speech synthesis calls.
    Tts,
}

/// Subscription plan classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

/// Voices accepted by the speech endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Neutral default voice.
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

/// Which sign-in flow issued an identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Federated OAuth popup sign-in.
    Google,
    /// Platform-SDK bridge sign-in.
    Kakao,
}

/// A user's subscription record as stored in the subscription directory.
///
/// Field names are camelCase on the wire to match the stored document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub is_active: bool,
    pub plan: Plan,
    /// Absolute expiry in epoch milliseconds. `None` means never expires.
    pub expires_at: Option<i64>,
}

impl Subscription {
    /// The premium-access invariant: active, premium plan, and not expired.
    ///
    /// Expiry uses a strict comparison -- a subscription whose `expires_at`
    /// equals `now_ms` no longer grants premium.
    pub fn grants_premium(&self, now_ms: i64) -> bool {
        self.is_active
            && self.plan == Plan::Premium
            && self.expires_at.is_none_or(|expires| expires > now_ms)
    }
}

/// The in-memory representation of the currently signed-in identity plus
/// its subscription snapshot.
///
/// Owned exclusively by the identity watcher; everything else sees
/// read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    /// Stable provider-namespaced identifier (e.g. `kakao:12345`).
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub provider: ProviderKind,
    pub subscription: Option<Subscription>,
}

impl UserSession {
    /// Whether this session currently satisfies the premium-access invariant.
    pub fn has_premium_access(&self, now_ms: i64) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|sub| sub.grants_premium(now_ms))
    }
}
