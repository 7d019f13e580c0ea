// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, sane sampling parameters,
//! and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::VentioConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VentioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.service.log_level
            ),
        });
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must be non-zero".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.temperature must be between 0.0 and 2.0, got {}",
                config.openai.temperature
            ),
        });
    }

    if config.openai.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.max_tokens must be greater than zero".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // The mint endpoint needs the full server credential set; catch a
    // half-configured set early rather than at request time.
    let identity = &config.identity;
    let server_creds = [
        ("identity.project_id", identity.project_id.is_some()),
        ("identity.client_email", identity.client_email.is_some()),
        ("identity.private_key", identity.private_key.is_some()),
    ];
    let present = server_creds.iter().filter(|(_, set)| *set).count();
    if present > 0 && present < server_creds.len() {
        let missing: Vec<&str> = server_creds
            .iter()
            .filter(|(_, set)| !set)
            .map(|(name, _)| *name)
            .collect();
        errors.push(ConfigError::Validation {
            message: format!(
                "identity server credentials are partially configured; missing {}",
                missing.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VentioConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = VentioConfig::default();
        config.service.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("service.log_level")));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = VentioConfig::default();
        config.gateway.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("gateway.port")));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = VentioConfig::default();
        config.openai.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("openai.temperature")));
    }

    #[test]
    fn partial_identity_credentials_are_rejected() {
        let mut config = VentioConfig::default();
        config.identity.project_id = Some("proj-1".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("partially configured")));
    }

    #[test]
    fn full_identity_credentials_pass() {
        let mut config = VentioConfig::default();
        config.identity.project_id = Some("proj-1".to_string());
        config.identity.client_email = Some("svc@proj-1.example".to_string());
        config.identity.private_key = Some("secret".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = VentioConfig::default();
        config.gateway.port = 0;
        config.openai.max_tokens = 0;
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected all errors, got {errors:?}");
    }
}
