// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits for the external identity services.
//!
//! The identity provider, the user/subscription document collections, and
//! network connectivity are opaque external services. The bridge only ever
//! talks to them through these traits, so tests substitute fakes and a
//! deployment wires its provider's SDK behind the same seams.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use ventio_core::{ProviderKind, Subscription, VentioError};

/// A signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderUser {
    /// Stable provider-namespaced identifier.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Which sign-in flow produced this identity.
    pub provider: ProviderKind,
}

/// Provider error codes that get dedicated user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// The sign-in popup was blocked by the browser.
    PopupBlocked,
    /// The current domain is not authorized with the provider.
    UnauthorizedDomain,
}

/// An authentication failure from a sign-in flow.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AuthError {
    /// Known provider error code, when one was reported.
    pub code: Option<AuthErrorCode>,
    /// Raw error message from the provider or flow.
    pub message: String,
}

impl AuthError {
    /// An error carrying a known provider code.
    pub fn coded(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// An error without a known code.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// The message to surface to the user.
    ///
    /// Known codes map to specific guidance; everything else surfaces the
    /// raw provider message.
    pub fn user_message(&self) -> String {
        match self.code {
            Some(AuthErrorCode::PopupBlocked) => {
                "팝업이 차단되었습니다. 브라우저 설정에서 팝업 차단을 해제해주세요.".to_string()
            }
            Some(AuthErrorCode::UnauthorizedDomain) => {
                "현재 도메인이 인증 서비스에 등록되지 않았습니다. 콘솔에서 승인된 도메인 목록에 추가해주세요."
                    .to_string()
            }
            None => self.message.clone(),
        }
    }
}

/// The federated identity provider (popup sign-in, custom-token exchange,
/// auth-state stream).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Opens the provider's popup flow and resolves with the signed-in user.
    async fn sign_in_federated(&self) -> Result<ProviderUser, AuthError>;

    /// Exchanges a backend-minted custom token for a provider session.
    async fn sign_in_custom_token(&self, token: &str) -> Result<ProviderUser, AuthError>;

    /// Ends the current provider session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Auth-state change stream. `None` means signed out. The auth watcher
    /// is the intended sole consumer.
    fn updates(&self) -> watch::Receiver<Option<ProviderUser>>;
}

/// The remote user-profile document collection.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Merge-upsert the user's profile document (uid, contact fields,
    /// provider, last-login).
    async fn upsert_profile(&self, user: &ProviderUser) -> Result<(), VentioError>;
}

/// The remote subscription document collection (source of truth).
#[async_trait]
pub trait SubscriptionDirectory: Send + Sync {
    /// Fetch the user's subscription record, if one exists.
    async fn fetch_subscription(&self, uid: &str) -> Result<Option<Subscription>, VentioError>;

    /// Overwrite the user's subscription record.
    async fn update_subscription(
        &self,
        uid: &str,
        subscription: &Subscription,
    ) -> Result<(), VentioError>;
}

/// Network reachability probe used by the subscription cache.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity that always reports online.
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}
