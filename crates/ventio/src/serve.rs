// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ventio serve` command implementation.
//!
//! Opens the service database, initializes the upstream client and the
//! identity admin from configuration, and runs the HTTP gateway.

use std::sync::Arc;

use tracing::{info, warn};
use ventio_config::model::VentioConfig;
use ventio_core::VentioError;
use ventio_gateway::{start_server, AppState, ServerConfig, SqliteIdentityAdmin};
use ventio_openai::OpenAiClient;
use ventio_store::Database;

/// Runs the `ventio serve` command.
pub async fn run_serve(config: VentioConfig) -> Result<(), VentioError> {
    info!("starting ventio serve");
    log_credential_presence(&config);

    let db = Database::open(&config.storage).await?;

    // Generation and speech degrade to a configuration error response when
    // no upstream key is available; the gateway still serves bridge login.
    let openai = match OpenAiClient::new(&config.openai) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "upstream client unavailable, generation and speech disabled");
            None
        }
    };

    // Bridge login degrades to a generic failure response when the server
    // credential set is absent.
    let admin = match (
        config.identity.client_email.clone(),
        config.identity.private_key.clone(),
    ) {
        (Some(client_email), Some(private_key)) => {
            Some(Arc::new(SqliteIdentityAdmin::new(
                db.clone(),
                client_email,
                private_key.into_bytes(),
            )) as Arc<dyn ventio_gateway::IdentityAdmin>)
        }
        _ => {
            warn!("identity server credentials not configured, bridge login disabled");
            None
        }
    };

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, AppState { openai, admin }).await
}

/// Log which credential groups are configured. Values are never logged.
fn log_credential_presence(config: &VentioConfig) {
    info!(
        openai_key = config.openai.api_key.is_some(),
        identity_server_credentials = config.identity.private_key.is_some(),
        identity_client_config = config.identity.api_key.is_some(),
        kakao_app_key = config.kakao.app_key.is_some(),
        "credential presence"
    );
}
