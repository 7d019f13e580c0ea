// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Like the original
//! service's API routes, the endpoints are public; access gating is the
//! client engine's concern.

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use ventio_core::VentioError;
use ventio_openai::OpenAiClient;

use crate::handlers;
use crate::minter::IdentityAdmin;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream client. `None` when no API key is configured; generation
    /// and speech then answer with a configuration error.
    pub openai: Option<OpenAiClient>,
    /// Identity admin for the bridge-login endpoint. `None` when the
    /// server credential set is not configured; bridge login then answers
    /// with a generic failure.
    pub admin: Option<Arc<dyn IdentityAdmin>>,
}

/// Gateway server configuration (mirrors GatewayConfig from ventio-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/generate", post(handlers::post_generate))
        .route("/api/tts", post(handlers::post_tts))
        .route("/api/auth/kakao", post(handlers::post_kakao_login))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), VentioError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VentioError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VentioError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minter::SqliteIdentityAdmin;
    use ventio_store::Database;

    #[tokio::test]
    async fn app_state_is_clone() {
        let db = Database::open_in_memory().await.unwrap();
        let state = AppState {
            openai: None,
            admin: Some(Arc::new(SqliteIdentityAdmin::new(
                db,
                "svc@example",
                b"key".to_vec(),
            ))),
        };
        let _cloned = state.clone();
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
