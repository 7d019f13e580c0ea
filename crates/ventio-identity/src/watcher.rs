// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide auth watcher.
//!
//! One watcher is created at application start and torn down at exit. It is
//! the sole writer of the published [`AuthState`]: sign-in flows go through
//! it, and the identity provider's state stream drives the
//! `Authenticated`/`Anonymous` transitions. On every provider change it
//! composes the session with the subscription cache and mirrors the
//! resulting premium state into the usage ledger's flag.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use ventio_core::UserSession;
use ventio_quota::UsageLedger;

use crate::bridge::IdentityBridge;
use crate::provider::{AuthError, IdentityProvider, ProviderUser};
use crate::session::AuthState;
use crate::subscription::SubscriptionCache;

/// Owns the auth state channel and the provider-listener task.
pub struct AuthWatcher {
    state: Arc<watch::Sender<AuthState>>,
    bridge: IdentityBridge,
    task: JoinHandle<()>,
}

impl AuthWatcher {
    /// Spawn the watcher. The provider's update stream is consumed until
    /// [`shutdown`](Self::shutdown) or until the provider goes away.
    pub fn spawn(
        provider: Arc<dyn IdentityProvider>,
        bridge: IdentityBridge,
        cache: SubscriptionCache,
        ledger: UsageLedger,
    ) -> Self {
        let (tx, _rx) = watch::channel(AuthState::Anonymous);
        let state = Arc::new(tx);

        let task = tokio::spawn(listen(provider.updates(), state.clone(), cache, ledger));

        Self {
            state,
            bridge,
            task,
        }
    }

    /// Snapshot of the current auth state.
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Snapshot of the current session, if authenticated.
    pub fn current_session(&self) -> Option<Arc<UserSession>> {
        self.current().session().cloned()
    }

    /// Subscribe to auth state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Run the federated sign-in flow.
    ///
    /// Publishes `Authenticating` for the duration; a failure publishes
    /// `Failed` with the user-facing message. The `Authenticated` transition
    /// arrives through the provider's state stream.
    pub async fn sign_in_federated(&self) -> Result<ProviderUser, AuthError> {
        self.state.send_replace(AuthState::Authenticating);
        match self.bridge.sign_in_federated().await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.state.send_replace(AuthState::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Run the platform bridge sign-in flow. Same state behavior as
    /// [`sign_in_federated`](Self::sign_in_federated).
    pub async fn sign_in_bridge(&self) -> Result<ProviderUser, AuthError> {
        self.state.send_replace(AuthState::Authenticating);
        match self.bridge.sign_in_bridge().await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.state.send_replace(AuthState::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// End the current session. The `Anonymous` transition arrives through
    /// the provider's state stream.
    pub async fn sign_out(&self) {
        self.bridge.sign_out().await;
    }

    /// Tear down the listener task.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for AuthWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The listener loop: composes and publishes a session for every provider
/// state change.
async fn listen(
    mut updates: watch::Receiver<Option<ProviderUser>>,
    state: Arc<watch::Sender<AuthState>>,
    cache: SubscriptionCache,
    ledger: UsageLedger,
) {
    loop {
        let user = updates.borrow_and_update().clone();
        match user {
            Some(user) => {
                let subscription = cache.fetch(&user.uid).await;
                let session = UserSession {
                    uid: user.uid,
                    email: user.email,
                    display_name: user.display_name,
                    photo_url: user.photo_url,
                    provider: user.provider,
                    subscription,
                };

                let premium = session.has_premium_access(Utc::now().timestamp_millis());
                if let Err(e) = ledger.set_premium(premium).await {
                    warn!(error = %e, "failed to mirror premium flag");
                }

                info!(uid = %session.uid, premium, "session established");
                state.send_replace(AuthState::Authenticated(Arc::new(session)));
            }
            None => {
                if state.borrow().is_authenticated() {
                    info!("session ended");
                }
                if let Err(e) = ledger.set_premium(false).await {
                    warn!(error = %e, "failed to clear premium flag");
                }
                state.send_replace(AuthState::Anonymous);
            }
        }

        if updates.changed().await.is_err() {
            // Provider dropped; nothing further to publish.
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PlatformProfile, PlatformSdk, PlatformToken};
    use crate::provider::{Connectivity, SubscriptionDirectory, UserDirectory};
    use async_trait::async_trait;
    use std::time::Duration;
    use ventio_core::{Plan, ProviderKind, Subscription, VentioError};
    use ventio_quota::Tier;
    use ventio_store::Database;

    /// Provider stub whose sign-in flows drive the update stream, the way a
    /// real provider SDK does.
    struct FlowProvider {
        tx: watch::Sender<Option<ProviderUser>>,
        fail_federated: bool,
    }

    impl FlowProvider {
        fn new(fail_federated: bool) -> Self {
            let (tx, _) = watch::channel(None);
            Self { tx, fail_federated }
        }

        fn user() -> ProviderUser {
            ProviderUser {
                uid: "google-uid-1".to_string(),
                email: Some("user@example.com".to_string()),
                display_name: Some("tester".to_string()),
                photo_url: None,
                provider: ProviderKind::Google,
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FlowProvider {
        async fn sign_in_federated(&self) -> Result<ProviderUser, AuthError> {
            if self.fail_federated {
                return Err(AuthError::coded(
                    crate::provider::AuthErrorCode::PopupBlocked,
                    "auth/popup-blocked",
                ));
            }
            let user = Self::user();
            self.tx.send_replace(Some(user.clone()));
            Ok(user)
        }

        async fn sign_in_custom_token(&self, _token: &str) -> Result<ProviderUser, AuthError> {
            let user = Self::user();
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

    struct NullPlatform;

    #[async_trait]
    impl PlatformSdk for NullPlatform {
        fn is_initialized(&self) -> bool {
            true
        }
        fn init(&self, _app_key: &str) {}
        async fn login(&self) -> Result<PlatformToken, AuthError> {
            Err(AuthError::other("not used"))
        }
        async fn fetch_profile(&self) -> Result<PlatformProfile, AuthError> {
            Err(AuthError::other("not used"))
        }
    }

    struct NullDirectory;

    #[async_trait]
    impl UserDirectory for NullDirectory {
        async fn upsert_profile(&self, _user: &ProviderUser) -> Result<(), VentioError> {
            Ok(())
        }
    }

    struct FixedSubscriptions(Option<Subscription>);

    #[async_trait]
    impl SubscriptionDirectory for FixedSubscriptions {
        async fn fetch_subscription(
            &self,
            _uid: &str,
        ) -> Result<Option<Subscription>, VentioError> {
            Ok(self.0.clone())
        }
        async fn update_subscription(
            &self,
            _uid: &str,
            _subscription: &Subscription,
        ) -> Result<(), VentioError> {
            Ok(())
        }
    }

    struct Online;
    impl Connectivity for Online {
        fn is_online(&self) -> bool {
            true
        }
    }

    async fn watcher_with(
        provider: Arc<FlowProvider>,
        subscription: Option<Subscription>,
    ) -> (AuthWatcher, UsageLedger) {
        let db = Database::open_in_memory().await.unwrap();
        let ledger = UsageLedger::new(db.clone());
        let cache = SubscriptionCache::new(
            db,
            Arc::new(FixedSubscriptions(subscription)),
            Arc::new(Online),
        );
        let bridge = IdentityBridge::new(
            provider.clone(),
            Arc::new(NullPlatform),
            Arc::new(NullDirectory),
            "http://unused.invalid",
            None,
        )
        .unwrap();
        (
            AuthWatcher::spawn(provider, bridge, cache, ledger.clone()),
            ledger,
        )
    }

    async fn wait_for<F>(watcher: &AuthWatcher, mut pred: F) -> AuthState
    where
        F: FnMut(&AuthState) -> bool,
    {
        let mut rx = watcher.subscribe();
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let state = rx.borrow_and_update().clone();
                    if pred(&state) {
                        return state;
                    }
                }
                rx.changed().await.expect("watcher dropped");
            }
        })
        .await
        .expect("timed out waiting for auth state")
    }

    #[tokio::test]
    async fn sign_in_publishes_session_with_subscription() {
        let provider = Arc::new(FlowProvider::new(false));
        let premium = Subscription {
            is_active: true,
            plan: Plan::Premium,
            expires_at: None,
        };
        let (watcher, ledger) = watcher_with(provider, Some(premium)).await;

        watcher.sign_in_federated().await.unwrap();
        let state = wait_for(&watcher, |s| s.is_authenticated()).await;

        let session = state.session().unwrap();
        assert_eq!(session.uid, "google-uid-1");
        assert!(session.subscription.is_some());
        assert_eq!(
            ledger.tier().await.unwrap(),
            Tier::Premium,
            "premium flag must mirror the composed session"
        );
    }

    #[tokio::test]
    async fn sign_out_returns_to_anonymous_and_clears_flag() {
        let provider = Arc::new(FlowProvider::new(false));
        let premium = Subscription {
            is_active: true,
            plan: Plan::Premium,
            expires_at: None,
        };
        let (watcher, ledger) = watcher_with(provider, Some(premium)).await;

        watcher.sign_in_federated().await.unwrap();
        wait_for(&watcher, |s| s.is_authenticated()).await;

        watcher.sign_out().await;
        wait_for(&watcher, |s| *s == AuthState::Anonymous).await;
        assert_eq!(ledger.tier().await.unwrap(), Tier::Free);
    }

    #[tokio::test]
    async fn failed_flow_publishes_failed_with_user_message() {
        let provider = Arc::new(FlowProvider::new(true));
        let (watcher, _ledger) = watcher_with(provider, None).await;

        let err = watcher.sign_in_federated().await.unwrap_err();
        assert!(err.user_message().contains("팝업"));

        let state = wait_for(&watcher, |s| matches!(s, AuthState::Failed(_))).await;
        match state {
            AuthState::Failed(message) => assert!(message.contains("팝업")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn session_without_subscription_mirrors_free() {
        let provider = Arc::new(FlowProvider::new(false));
        let (watcher, ledger) = watcher_with(provider, None).await;

        watcher.sign_in_federated().await.unwrap();
        let state = wait_for(&watcher, |s| s.is_authenticated()).await;
        assert!(state.session().unwrap().subscription.is_none());
        assert_eq!(ledger.tier().await.unwrap(), Tier::Free);
    }

    #[tokio::test]
    async fn current_session_snapshot() {
        let provider = Arc::new(FlowProvider::new(false));
        let (watcher, _ledger) = watcher_with(provider, None).await;
        assert!(watcher.current_session().is_none());

        watcher.sign_in_federated().await.unwrap();
        wait_for(&watcher, |s| s.is_authenticated()).await;
        assert_eq!(watcher.current_session().unwrap().uid, "google-uid-1");
    }
}
