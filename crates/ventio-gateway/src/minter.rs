// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical identity registry and custom-token minting.
//!
//! The bridge-login endpoint exchanges a platform identity for a signed
//! custom credential. Canonical identities are rows in the service
//! database, keyed by the provider-namespaced uid; tokens are
//! HMAC-SHA256-signed JWTs over the service-account private key.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info};
use ventio_core::VentioError;
use ventio_store::models::AuthUser;
use ventio_store::queries::users;
use ventio_store::Database;

type HmacSha256 = Hmac<Sha256>;

/// Audience claim expected by the identity provider's token endpoint.
const TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Token lifetime in seconds.
const TOKEN_TTL_SECS: i64 = 3600;

/// Profile fields accompanying an identity at mint time.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// The identity-admin surface the bridge-login handler needs.
#[async_trait]
pub trait IdentityAdmin: Send + Sync {
    /// Create the canonical identity if it does not exist; touch its
    /// last-login otherwise.
    async fn ensure_user(
        &self,
        uid: &str,
        provider: &str,
        profile: &ProfileFields,
    ) -> Result<(), VentioError>;

    /// Mint a signed custom token for the identity.
    async fn mint_custom_token(&self, uid: &str, provider: &str) -> Result<String, VentioError>;
}

/// Claims carried by a minted custom token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub uid: String,
    pub iat: i64,
    pub exp: i64,
    pub claims: ProviderClaim,
}

/// Custom claims attached to the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderClaim {
    pub provider: String,
}

/// `IdentityAdmin` backed by the service database and the configured
/// service-account credentials.
pub struct SqliteIdentityAdmin {
    db: Database,
    issuer: String,
    signing_key: Vec<u8>,
}

impl SqliteIdentityAdmin {
    /// Create an admin signing with the service account's private key and
    /// issuing as its client email.
    pub fn new(db: Database, client_email: impl Into<String>, private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            db,
            issuer: client_email.into(),
            signing_key: private_key.into(),
        }
    }
}

#[async_trait]
impl IdentityAdmin for SqliteIdentityAdmin {
    async fn ensure_user(
        &self,
        uid: &str,
        provider: &str,
        profile: &ProfileFields,
    ) -> Result<(), VentioError> {
        let now = chrono::Utc::now().to_rfc3339();
        match users::get(&self.db, uid).await? {
            Some(_) => {
                debug!(uid, "existing identity, touching last login");
                users::touch_last_login(&self.db, uid, &now).await
            }
            None => {
                info!(uid, provider, "creating canonical identity");
                users::insert(
                    &self.db,
                    &AuthUser {
                        uid: uid.to_string(),
                        provider: provider.to_string(),
                        email: profile.email.clone(),
                        display_name: profile.display_name.clone(),
                        photo_url: profile.photo_url.clone(),
                        created_at: now.clone(),
                        last_login: now,
                    },
                )
                .await
            }
        }
    }

    async fn mint_custom_token(&self, uid: &str, provider: &str) -> Result<String, VentioError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = TokenClaims {
            iss: self.issuer.clone(),
            sub: self.issuer.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            uid: uid.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
            claims: ProviderClaim {
                provider: provider.to_string(),
            },
        };
        sign_token(&claims, &self.signing_key)
    }
}

/// Sign claims into a compact JWT.
fn sign_token(claims: &TokenClaims, key: &[u8]) -> Result<String, VentioError> {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::to_vec(claims)
        .map_err(|e| VentioError::Internal(format!("claims serialization failed: {e}")))?;
    let payload = URL_SAFE_NO_PAD.encode(payload);
    let signing_input = format!("{header}.{payload}");

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| VentioError::Internal(format!("invalid signing key: {e}")))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

/// Verify a minted token's signature and decode its claims.
pub fn verify_token(token: &str, key: &[u8]) -> Result<TokenClaims, VentioError> {
    let mut parts = token.split('.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => return Err(VentioError::Auth {
            message: "malformed token".to_string(),
            source: None,
        }),
    };

    let signing_input = format!("{header}.{payload}");
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| VentioError::Internal(format!("invalid signing key: {e}")))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| VentioError::Auth {
            message: "malformed token signature".to_string(),
            source: None,
        })?;
    mac.verify_slice(&signature).map_err(|_| VentioError::Auth {
        message: "token signature mismatch".to_string(),
        source: None,
    })?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| VentioError::Auth {
            message: "malformed token payload".to_string(),
            source: None,
        })?;
    serde_json::from_slice(&payload).map_err(|e| VentioError::Auth {
        message: format!("invalid token claims: {e}"),
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test-signing-key";

    fn admin(db: Database) -> SqliteIdentityAdmin {
        SqliteIdentityAdmin::new(db, "svc@proj-1.example", KEY)
    }

    #[tokio::test]
    async fn minted_token_verifies_and_carries_identity() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = admin(db);

        let token = admin.mint_custom_token("kakao:12345", "kakao").await.unwrap();
        let claims = verify_token(&token, KEY).unwrap();

        assert_eq!(claims.uid, "kakao:12345");
        assert_eq!(claims.claims.provider, "kakao");
        assert_eq!(claims.iss, "svc@proj-1.example");
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_SECS);
    }

    #[tokio::test]
    async fn token_with_wrong_key_fails_verification() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = admin(db);

        let token = admin.mint_custom_token("kakao:12345", "kakao").await.unwrap();
        assert!(verify_token(&token, b"other-key").is_err());
    }

    #[tokio::test]
    async fn tampered_token_fails_verification() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = admin(db);

        let token = admin.mint_custom_token("kakao:12345", "kakao").await.unwrap();
        let mut tampered = token.clone();
        tampered.replace_range(..2, "XX");
        assert!(verify_token(&tampered, KEY).is_err());
        assert!(verify_token("just.two", KEY).is_err());
    }

    #[tokio::test]
    async fn ensure_user_creates_then_reuses() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = admin(db.clone());
        let profile = ProfileFields {
            email: Some("user@example.com".to_string()),
            display_name: Some("tester".to_string()),
            photo_url: None,
        };

        admin.ensure_user("kakao:12345", "kakao", &profile).await.unwrap();
        let first = users::get(&db, "kakao:12345").await.unwrap().unwrap();

        admin.ensure_user("kakao:12345", "kakao", &profile).await.unwrap();
        let second = users::get(&db, "kakao:12345").await.unwrap().unwrap();

        assert_eq!(
            first.created_at, second.created_at,
            "repeat login must reuse the identity"
        );
        assert_eq!(second.email.as_deref(), Some("user@example.com"));
    }
}
