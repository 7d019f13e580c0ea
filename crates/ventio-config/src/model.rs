// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ventio expression service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ventio configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// credentials default to `None` and are validated at the point of use.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VentioConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP gateway bind settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Upstream completion/speech API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Identity-provider credentials (server-side set plus client config).
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Platform bridge SDK settings.
    #[serde(default)]
    pub kakao: KakaoConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "ventio".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Upstream OpenAI API configuration.
///
/// One credential is shared by the completion and speech endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` requires the `OPENAI_API_KEY` environment variable;
    /// requests fail with a configuration error when neither is set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override for the API (proxies, test doubles).
    #[serde(default)]
    pub api_base: Option<String>,

    /// Chat completion model.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Speech synthesis model.
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Sampling temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Token ceiling per generated response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            chat_model: default_chat_model(),
            tts_model: default_tts_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_temperature() -> f64 {
    0.8
}

fn default_max_tokens() -> u32 {
    200
}

/// Identity-provider credentials.
///
/// The server credential set (`project_id`, `client_email`, `private_key`)
/// signs custom tokens on the mint endpoint; the remaining fields are the
/// client-side provider configuration handed to sign-in flows.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Provider project identifier.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Service account email used as the token issuer.
    #[serde(default)]
    pub client_email: Option<String>,

    /// Service account private key used to sign custom tokens.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Client API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Authorized auth domain for popup sign-in.
    #[serde(default)]
    pub auth_domain: Option<String>,

    /// Storage bucket identifier.
    #[serde(default)]
    pub storage_bucket: Option<String>,

    /// Messaging sender identifier.
    #[serde(default)]
    pub messaging_sender_id: Option<String>,

    /// Client application identifier.
    #[serde(default)]
    pub app_id: Option<String>,
}

/// Platform bridge SDK configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KakaoConfig {
    /// App key used to initialize the platform SDK on demand.
    /// `None` disables the bridge sign-in flow.
    #[serde(default)]
    pub app_key: Option<String>,
}

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ventio").join("ventio.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("ventio.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
