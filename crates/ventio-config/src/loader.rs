// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ventio.toml` > `~/.config/ventio/ventio.toml` > `/etc/ventio/ventio.toml`
//! with environment variable overrides via `VENTIO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VentioConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ventio/ventio.toml` (system-wide)
/// 3. `~/.config/ventio/ventio.toml` (user XDG config)
/// 4. `./ventio.toml` (local directory)
/// 5. `VENTIO_*` environment variables
pub fn load_config() -> Result<VentioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VentioConfig::default()))
        .merge(Toml::file("/etc/ventio/ventio.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ventio/ventio.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ventio.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VentioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VentioConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VentioConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VentioConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VENTIO_OPENAI_API_KEY`
/// must map to `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("VENTIO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VENTIO_OPENAI_API_KEY -> "openai_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("identity_", "identity.", 1)
            .replacen("kakao_", "kakao.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
