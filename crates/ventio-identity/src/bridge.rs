// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two sign-in flows: federated popup and platform bridge.
//!
//! Both flows end with the identity provider holding a session (its state
//! stream then drives the auth watcher) and a fire-and-forget profile
//! upsert. The bridge flow additionally exchanges a platform token for a
//! backend-minted custom credential before signing in.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::platform::{PlatformProfile, PlatformSdk, PlatformToken};
use crate::provider::{AuthError, IdentityProvider, ProviderUser, UserDirectory};

/// Generic failure message for bridge-flow errors that carry no specific
/// backend-reported cause.
const BRIDGE_LOGIN_FAILED: &str = "카카오 로그인 중 오류가 발생했습니다.";

/// Request body for the backend mint endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MintRequest {
    kakao_access_token: String,
    kakao_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
}

/// Success body from the backend mint endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintResponse {
    custom_token: String,
}

/// Error body from the backend mint endpoint.
#[derive(Debug, Deserialize)]
struct MintError {
    error: String,
}

/// Orchestrates the federated and bridge sign-in flows.
pub struct IdentityBridge {
    provider: Arc<dyn IdentityProvider>,
    platform: Arc<dyn PlatformSdk>,
    directory: Arc<dyn UserDirectory>,
    http: reqwest::Client,
    mint_url: String,
    platform_app_key: Option<String>,
}

impl IdentityBridge {
    /// Create a bridge over the given external services.
    ///
    /// `mint_url` is the backend endpoint that exchanges a platform token
    /// for a custom credential; `platform_app_key` enables the bridge flow.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        platform: Arc<dyn PlatformSdk>,
        directory: Arc<dyn UserDirectory>,
        mint_url: impl Into<String>,
        platform_app_key: Option<String>,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            provider,
            platform,
            directory,
            http,
            mint_url: mint_url.into(),
            platform_app_key,
        })
    }

    /// Federated popup sign-in.
    pub async fn sign_in_federated(&self) -> Result<ProviderUser, AuthError> {
        let user = self.provider.sign_in_federated().await.inspect_err(|e| {
            warn!(code = ?e.code, message = %e.message, "federated sign-in failed");
        })?;
        info!(uid = %user.uid, "federated sign-in succeeded");
        self.upsert_profile_best_effort(&user).await;
        Ok(user)
    }

    /// Platform bridge sign-in: platform login -> profile fetch -> backend
    /// mint -> custom-token sign-in.
    pub async fn sign_in_bridge(&self) -> Result<ProviderUser, AuthError> {
        let app_key = self
            .platform_app_key
            .as_deref()
            .ok_or_else(|| AuthError::other("카카오 SDK가 로드되지 않았습니다."))?;

        if !self.platform.is_initialized() {
            self.platform.init(app_key);
        }

        let token = self.platform.login().await.inspect_err(|e| {
            warn!(message = %e.message, "platform login failed");
        })?;
        let profile = self.platform.fetch_profile().await.inspect_err(|e| {
            warn!(message = %e.message, "platform profile fetch failed");
        })?;

        let custom_token = self.mint_custom_token(&token, &profile).await?;
        let user = self
            .provider
            .sign_in_custom_token(&custom_token)
            .await
            .inspect_err(|e| {
                warn!(message = %e.message, "custom-token sign-in failed");
            })?;

        info!(uid = %user.uid, "bridge sign-in succeeded");
        self.upsert_profile_best_effort(&user).await;
        Ok(user)
    }

    /// End the provider session. Provider failures are logged and swallowed.
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            warn!(message = %e.message, "sign-out failed");
        }
    }

    /// Exchange a platform token + profile for a backend-minted credential.
    async fn mint_custom_token(
        &self,
        token: &PlatformToken,
        profile: &PlatformProfile,
    ) -> Result<String, AuthError> {
        let request = MintRequest {
            kakao_access_token: token.access_token.clone(),
            kakao_id: profile.id,
            email: profile.email.clone(),
            display_name: profile.nickname.clone(),
            photo_url: profile.profile_image_url.clone(),
        };

        let response = self
            .http
            .post(&self.mint_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "mint request failed");
                AuthError::other(BRIDGE_LOGIN_FAILED)
            })?;

        let status = response.status();
        if !status.is_success() {
            // Surface the backend's reported cause when it gave one.
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MintError>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| BRIDGE_LOGIN_FAILED.to_string());
            warn!(status = %status, "mint endpoint rejected bridge login");
            return Err(AuthError::other(message));
        }

        let minted: MintResponse = response
            .json()
            .await
            .map_err(|_| AuthError::other(BRIDGE_LOGIN_FAILED))?;
        Ok(minted.custom_token)
    }

    /// Upsert the profile document; failure never fails the login.
    async fn upsert_profile_best_effort(&self, user: &ProviderUser) {
        if let Err(e) = self.directory.upsert_profile(user).await {
            warn!(uid = %user.uid, error = %e, "profile upsert failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::watch;
    use ventio_core::{ProviderKind, VentioError};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_user(uid: &str, provider: ProviderKind) -> ProviderUser {
        ProviderUser {
            uid: uid.to_string(),
            email: Some("user@example.com".to_string()),
            display_name: Some("tester".to_string()),
            photo_url: None,
            provider,
        }
    }

    struct StubProvider {
        tx: watch::Sender<Option<ProviderUser>>,
        federated_result: Mutex<Option<Result<ProviderUser, AuthError>>>,
    }

    impl StubProvider {
        fn new() -> Self {
            let (tx, _) = watch::channel(None);
            Self {
                tx,
                federated_result: Mutex::new(None),
            }
        }

        fn with_federated(user: ProviderUser) -> Self {
            let stub = Self::new();
            *stub.federated_result.lock().unwrap() = Some(Ok(user));
            stub
        }
    }

    #[async_trait]
    impl IdentityProvider for StubProvider {
        async fn sign_in_federated(&self) -> Result<ProviderUser, AuthError> {
            self.federated_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(AuthError::other("no stubbed result")))
        }

        async fn sign_in_custom_token(&self, token: &str) -> Result<ProviderUser, AuthError> {
            // The stub derives the uid from the token for assertion purposes.
            Ok(provider_user(
                &format!("minted:{token}"),
                ProviderKind::Kakao,
            ))
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.tx.send_replace(None);
            Ok(())
        }

        fn updates(&self) -> watch::Receiver<Option<ProviderUser>> {
            self.tx.subscribe()
        }
    }

    struct StubPlatform {
        initialized: AtomicBool,
        fail_login: bool,
    }

    impl StubPlatform {
        fn new() -> Self {
            Self {
                initialized: AtomicBool::new(false),
                fail_login: false,
            }
        }
    }

    #[async_trait]
    impl PlatformSdk for StubPlatform {
        fn is_initialized(&self) -> bool {
            self.initialized.load(Ordering::SeqCst)
        }

        fn init(&self, _app_key: &str) {
            self.initialized.store(true, Ordering::SeqCst);
        }

        async fn login(&self) -> Result<PlatformToken, AuthError> {
            if self.fail_login {
                return Err(AuthError::other("user cancelled"));
            }
            Ok(PlatformToken {
                access_token: "platform-token".to_string(),
            })
        }

        async fn fetch_profile(&self) -> Result<PlatformProfile, AuthError> {
            Ok(PlatformProfile {
                id: 12345,
                email: Some("user@example.com".to_string()),
                nickname: Some("tester".to_string()),
                profile_image_url: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingDirectory {
        upserts: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl UserDirectory for RecordingDirectory {
        async fn upsert_profile(&self, _user: &ProviderUser) -> Result<(), VentioError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(VentioError::Internal("directory down".into()));
            }
            Ok(())
        }
    }

    fn bridge(
        provider: Arc<StubProvider>,
        platform: Arc<StubPlatform>,
        directory: Arc<RecordingDirectory>,
        mint_url: &str,
    ) -> IdentityBridge {
        IdentityBridge::new(
            provider,
            platform,
            directory,
            mint_url,
            Some("app-key".to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn federated_flow_signs_in_and_upserts() {
        let provider = Arc::new(StubProvider::with_federated(provider_user(
            "google-uid-1",
            ProviderKind::Google,
        )));
        let directory = Arc::new(RecordingDirectory::default());
        let b = bridge(
            provider,
            Arc::new(StubPlatform::new()),
            directory.clone(),
            "http://unused.invalid",
        );

        let user = b.sign_in_federated().await.unwrap();
        assert_eq!(user.uid, "google-uid-1");
        assert_eq!(directory.upserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn federated_flow_succeeds_even_when_upsert_fails() {
        let provider = Arc::new(StubProvider::with_federated(provider_user(
            "google-uid-1",
            ProviderKind::Google,
        )));
        let directory = Arc::new(RecordingDirectory {
            fail: true,
            ..RecordingDirectory::default()
        });
        let b = bridge(
            provider,
            Arc::new(StubPlatform::new()),
            directory.clone(),
            "http://unused.invalid",
        );

        assert!(b.sign_in_federated().await.is_ok());
        assert_eq!(directory.upserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bridge_flow_initializes_sdk_and_exchanges_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/kakao"))
            .and(body_partial_json(serde_json::json!({
                "kakaoAccessToken": "platform-token",
                "kakaoId": 12345
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"customToken": "ct-1"})),
            )
            .mount(&server)
            .await;

        let platform = Arc::new(StubPlatform::new());
        let directory = Arc::new(RecordingDirectory::default());
        let b = bridge(
            Arc::new(StubProvider::new()),
            platform.clone(),
            directory.clone(),
            &format!("{}/api/auth/kakao", server.uri()),
        );

        let user = b.sign_in_bridge().await.unwrap();
        assert!(platform.is_initialized(), "SDK must be initialized on demand");
        assert_eq!(user.uid, "minted:ct-1");
        assert_eq!(directory.upserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bridge_flow_without_app_key_fails_with_sdk_message() {
        let b = IdentityBridge::new(
            Arc::new(StubProvider::new()),
            Arc::new(StubPlatform::new()),
            Arc::new(RecordingDirectory::default()),
            "http://unused.invalid",
            None,
        )
        .unwrap();
        let err = b.sign_in_bridge().await.unwrap_err();
        assert!(err.message.contains("SDK"));
    }

    #[tokio::test]
    async fn bridge_flow_surfaces_backend_reported_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "카카오 ID가 필요합니다."})),
            )
            .mount(&server)
            .await;

        let b = bridge(
            Arc::new(StubProvider::new()),
            Arc::new(StubPlatform::new()),
            Arc::new(RecordingDirectory::default()),
            &server.uri(),
        );
        let err = b.sign_in_bridge().await.unwrap_err();
        assert_eq!(err.message, "카카오 ID가 필요합니다.");
    }

    #[tokio::test]
    async fn bridge_flow_maps_unstructured_failure_to_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let b = bridge(
            Arc::new(StubProvider::new()),
            Arc::new(StubPlatform::new()),
            Arc::new(RecordingDirectory::default()),
            &server.uri(),
        );
        let err = b.sign_in_bridge().await.unwrap_err();
        assert_eq!(err.message, BRIDGE_LOGIN_FAILED);
    }

    #[tokio::test]
    async fn platform_login_failure_aborts_before_minting() {
        let platform = Arc::new(StubPlatform {
            initialized: AtomicBool::new(true),
            fail_login: true,
        });
        let directory = Arc::new(RecordingDirectory::default());
        let b = bridge(
            Arc::new(StubProvider::new()),
            platform,
            directory.clone(),
            "http://unused.invalid",
        );
        assert!(b.sign_in_bridge().await.is_err());
        assert_eq!(directory.upserts.load(Ordering::SeqCst), 0);
    }
}
