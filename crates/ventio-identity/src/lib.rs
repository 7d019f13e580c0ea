// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity layer for the Ventio expression service.
//!
//! Unifies two sign-in flows (federated OAuth popup, platform-SDK bridge)
//! into one published [`AuthState`], composed with subscription data from a
//! TTL-bounded cache. The external identity services appear only behind
//! capability traits ([`provider`], [`platform`]), so the whole layer runs
//! against fakes in tests.

pub mod bridge;
pub mod payment;
pub mod platform;
pub mod provider;
pub mod session;
pub mod subscription;
pub mod watcher;

pub use bridge::IdentityBridge;
pub use payment::PaymentProcessor;
pub use platform::{PlatformProfile, PlatformSdk, PlatformToken};
pub use provider::{
    AlwaysOnline, AuthError, AuthErrorCode, Connectivity, IdentityProvider, ProviderUser,
    SubscriptionDirectory, UserDirectory,
};
pub use session::AuthState;
pub use subscription::SubscriptionCache;
pub use watcher::AuthWatcher;
