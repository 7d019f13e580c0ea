// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic fakes for the external identity services.
//!
//! Every capability trait the identity layer depends on has a fake here:
//! the identity provider (push-driven state stream), the platform SDK, the
//! user and subscription directories, and connectivity. Integration tests
//! wire these into the real watcher/bridge/cache/engine stack and run
//! without any network.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;
use ventio_core::{ProviderKind, Subscription, VentioError};
use ventio_identity::{
    AuthError, Connectivity, IdentityProvider, PlatformProfile, PlatformSdk, PlatformToken,
    ProviderUser, SubscriptionDirectory, UserDirectory,
};

/// A ready-made provider user for tests.
pub fn test_user(uid: &str, provider: ProviderKind) -> ProviderUser {
    ProviderUser {
        uid: uid.to_string(),
        email: Some(format!("{uid}@example.com")),
        display_name: Some("tester".to_string()),
        photo_url: None,
        provider,
    }
}

/// Fake identity provider whose sign-in flows succeed with a configured
/// user and drive the update stream the way a real provider SDK does.
pub struct FakeIdentityProvider {
    tx: watch::Sender<Option<ProviderUser>>,
    federated_user: Mutex<Option<ProviderUser>>,
    federated_error: Mutex<Option<AuthError>>,
}

impl FakeIdentityProvider {
    /// Provider with no configured federated user; sign-in flows fail
    /// until one is set.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            federated_user: Mutex::new(None),
            federated_error: Mutex::new(None),
        }
    }

    /// Provider whose federated flow signs in the given user.
    pub fn with_user(user: ProviderUser) -> Self {
        let provider = Self::new();
        *provider.federated_user.lock().unwrap() = Some(user);
        provider
    }

    /// Make the federated flow fail with the given error.
    pub fn fail_federated_with(&self, error: AuthError) {
        *self.federated_error.lock().unwrap() = Some(error);
    }

    /// Push a raw auth-state change, bypassing the flows.
    pub fn push_user(&self, user: Option<ProviderUser>) {
        self.tx.send_replace(user);
    }
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in_federated(&self) -> Result<ProviderUser, AuthError> {
        if let Some(error) = self.federated_error.lock().unwrap().take() {
            return Err(error);
        }
        let user = self
            .federated_user
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AuthError::other("no federated user configured"))?;
        self.tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_custom_token(&self, token: &str) -> Result<ProviderUser, AuthError> {
        // Derive a stable identity from the token so assertions can see it.
        let user = test_user(&format!("minted:{token}"), ProviderKind::Kakao);
        self.tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.tx.send_replace(None);
        Ok(())
    }

    fn updates(&self) -> watch::Receiver<Option<ProviderUser>> {
        self.tx.subscribe()
    }
}

/// Fake platform SDK with configurable login behavior.
pub struct FakePlatformSdk {
    initialized: AtomicBool,
    profile: PlatformProfile,
    fail_login: AtomicBool,
}

impl FakePlatformSdk {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            initialized: AtomicBool::new(false),
            profile,
            fail_login: AtomicBool::new(false),
        }
    }

    /// Make subsequent logins fail, as a user cancelling does.
    pub fn fail_login(&self) {
        self.fail_login.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlatformSdk for FakePlatformSdk {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn init(&self, _app_key: &str) {
        self.initialized.store(true, Ordering::SeqCst);
    }

    async fn login(&self) -> Result<PlatformToken, AuthError> {
        if self.fail_login.load(Ordering::SeqCst) {
            return Err(AuthError::other("user cancelled"));
        }
        Ok(PlatformToken {
            access_token: "fake-platform-token".to_string(),
        })
    }

    async fn fetch_profile(&self) -> Result<PlatformProfile, AuthError> {
        Ok(self.profile.clone())
    }
}

/// Fake user directory recording every upsert.
#[derive(Default)]
pub struct FakeUserDirectory {
    upserts: Mutex<Vec<ProviderUser>>,
    fail: AtomicBool,
}

impl FakeUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent upserts fail.
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Users upserted so far.
    pub fn upserted(&self) -> Vec<ProviderUser> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn upsert_profile(&self, user: &ProviderUser) -> Result<(), VentioError> {
        self.upserts.lock().unwrap().push(user.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(VentioError::Internal("directory unavailable".into()));
        }
        Ok(())
    }
}

/// Fake subscription directory with a call counter, for cache-hit
/// assertions.
pub struct FakeSubscriptionDirectory {
    record: Mutex<Option<Subscription>>,
    fail: AtomicBool,
    fetch_calls: AtomicUsize,
}

impl FakeSubscriptionDirectory {
    /// Directory answering every fetch with the given record.
    pub fn returning(record: Option<Subscription>) -> Self {
        Self {
            record: Mutex::new(record),
            fail: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Make subsequent fetches fail.
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Replace the stored record.
    pub fn set_record(&self, record: Option<Subscription>) {
        *self.record.lock().unwrap() = record;
    }

    /// Number of remote fetches performed.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionDirectory for FakeSubscriptionDirectory {
    async fn fetch_subscription(&self, _uid: &str) -> Result<Option<Subscription>, VentioError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(VentioError::Internal("directory unavailable".into()));
        }
        Ok(self.record.lock().unwrap().clone())
    }

    async fn update_subscription(
        &self,
        _uid: &str,
        subscription: &Subscription,
    ) -> Result<(), VentioError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(VentioError::Internal("directory unavailable".into()));
        }
        *self.record.lock().unwrap() = Some(subscription.clone());
        Ok(())
    }
}

/// Connectivity toggled from the test body.
pub struct FakeConnectivity(AtomicBool);

impl FakeConnectivity {
    pub fn online() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn offline() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for FakeConnectivity {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
