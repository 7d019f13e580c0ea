// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability trait for the platform SDK used by the bridge sign-in flow.
//!
//! The real SDK lives in a global namespace on its own platform; the bridge
//! only sees this interface, which makes the flow testable with a fake.

use async_trait::async_trait;

use crate::provider::AuthError;

/// An access token issued by the platform after login.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformToken {
    pub access_token: String,
}

/// Profile fields fetched from the platform after login.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlatformProfile {
    /// Numeric platform account identifier.
    pub id: i64,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

/// The platform SDK surface the bridge flow needs.
#[async_trait]
pub trait PlatformSdk: Send + Sync {
    /// Whether the SDK has been initialized with an app key.
    fn is_initialized(&self) -> bool;

    /// Initialize the SDK with the configured app key.
    fn init(&self, app_key: &str);

    /// Request platform login. Suspends until the platform's callback fires;
    /// the platform's failure callback maps to an `Err`.
    async fn login(&self) -> Result<PlatformToken, AuthError>;

    /// Request the logged-in user's profile. Same suspend-on-callback shape.
    async fn fetch_profile(&self) -> Result<PlatformProfile, AuthError>;
}
