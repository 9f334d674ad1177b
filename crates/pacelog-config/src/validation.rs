// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Enforces the startup-fatal requirements: LINE credentials and the Typhoon
//! API key must be present, paths must be non-empty, and tuning values must
//! be in range. Collects all errors instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::PacelogConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected validation error.
pub fn validate_config(config: &PacelogConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Required credentials: absence is a startup-fatal condition.
    if is_blank(&config.line.channel_secret) {
        errors.push(ConfigError::MissingKey {
            key: "line.channel_secret".to_string(),
        });
    }
    if is_blank(&config.line.channel_access_token) {
        errors.push(ConfigError::MissingKey {
            key: "line.channel_access_token".to_string(),
        });
    }
    if is_blank(&config.typhoon.api_key) {
        errors.push(ConfigError::MissingKey {
            key: "typhoon.api_key".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }
    if config.storage.media_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.media_dir must not be empty".to_string(),
        });
    }
    if config.storage.public_base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.public_base_url must not be empty".to_string(),
        });
    }

    // Bind address must be a valid IP or hostname.
    let addr = config.gateway.host.trim();
    if addr.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.pipeline.call_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.call_timeout_secs must be at least 1".to_string(),
        });
    }
    if config.pipeline.max_image_width < 100 {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.max_image_width must be at least 100, got {}",
                config.pipeline.max_image_width
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_credentials() -> PacelogConfig {
        let mut config = PacelogConfig::default();
        config.line.channel_secret = Some("secret".to_string());
        config.line.channel_access_token = Some("token".to_string());
        config.typhoon.api_key = Some("key".to_string());
        config
    }

    #[test]
    fn credentials_present_passes() {
        let config = config_with_credentials();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn default_config_fails_on_missing_credentials() {
        let config = PacelogConfig::default();
        let errors = validate_config(&config).unwrap_err();
        let missing: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::MissingKey { key } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert!(missing.contains(&"line.channel_secret"));
        assert!(missing.contains(&"line.channel_access_token"));
        assert!(missing.contains(&"typhoon.api_key"));
    }

    #[test]
    fn blank_credential_is_treated_as_missing() {
        let mut config = config_with_credentials();
        config.typhoon.api_key = Some("   ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::MissingKey { key } if key == "typhoon.api_key")
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = config_with_credentials();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = config_with_credentials();
        config.pipeline.call_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("call_timeout_secs"))
        ));
    }

    #[test]
    fn tiny_image_width_fails_validation() {
        let mut config = config_with_credentials();
        config.pipeline.max_image_width = 10;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("max_image_width"))
        ));
    }

    #[test]
    fn all_errors_are_collected_not_first_only() {
        let mut config = PacelogConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 4, "expected all errors, got {errors:?}");
    }
}
