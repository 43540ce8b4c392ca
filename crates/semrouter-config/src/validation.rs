// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: ranges, non-empty
//! strings, and cross-field requirements.

use crate::diagnostic::ConfigError;
use crate::model::SemrouterConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every violation rather than failing on the first.
pub fn validate_config(config: &SemrouterConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let classifier = &config.classifier;
    if classifier.host.trim().is_empty() {
        errors.push(ConfigError::validation("classifier.host must not be empty"));
    }
    if classifier.port == 0 {
        errors.push(ConfigError::validation("classifier.port must be non-zero"));
    }

    let routing = &config.routing;
    let threshold = routing.confidence_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        errors.push(ConfigError::validation(format!(
            "routing.confidence_threshold must be in (0, 1], got {threshold}"
        )));
    }
    if routing.default_model.trim().is_empty() {
        errors.push(ConfigError::validation(
            "routing.default_model must not be empty",
        ));
    }

    let cache = &config.cache;
    if cache.enabled {
        if cache.max_size == 0 {
            errors.push(ConfigError::validation(
                "cache.max_size must be greater than 0 when the cache is enabled",
            ));
        }
        if cache.ttl_seconds == 0 {
            errors.push(ConfigError::validation(
                "cache.ttl_seconds must be greater than 0 when the cache is enabled",
            ));
        }
    }

    let data = &config.data_collection;
    if !(0.0..=1.0).contains(&data.sampling_rate) {
        errors.push(ConfigError::validation(format!(
            "data_collection.sampling_rate must be in [0, 1], got {}",
            data.sampling_rate
        )));
    }
    if data.enabled {
        match data.storage_endpoint.as_deref().map(str::trim) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
            Some(url) => errors.push(ConfigError::validation(format!(
                "data_collection.storage_endpoint `{url}` must be an http(s) URL"
            ))),
            None => errors.push(ConfigError::validation(
                "data_collection.storage_endpoint is required when data collection is enabled",
            )),
        }
        if data.timeout_ms == 0 {
            errors.push(ConfigError::validation(
                "data_collection.timeout_ms must be greater than 0 when data collection is enabled",
            ));
        }
    }

    let metrics_path = &config.monitoring.metrics_path;
    if !metrics_path.starts_with('/') {
        errors.push(ConfigError::validation(format!(
            "monitoring.metrics_path `{metrics_path}` must start with `/`"
        )));
    } else if metrics_path == "/health" {
        errors.push(ConfigError::validation(
            "monitoring.metrics_path must not shadow `/health`",
        ));
    }

    let server = &config.server;
    if !LOG_LEVELS.contains(&server.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "server.log_level `{}` is not one of {}",
            server.log_level,
            LOG_LEVELS.join(", ")
        )));
    }
    if server.upstream_url.trim().is_empty() {
        errors.push(ConfigError::validation(
            "server.upstream_url must not be empty",
        ));
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
    fn defaults_are_valid() {
        assert!(validate_config(&SemrouterConfig::default()).is_ok());
    }

    #[test]
    fn threshold_bounds() {
        let mut config = SemrouterConfig::default();
        config.routing.confidence_threshold = 1.0;
        assert!(validate_config(&config).is_ok());

        config.routing.confidence_threshold = 0.0;
        assert!(validate_config(&config).is_err());

        config.routing.confidence_threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn disabled_cache_skips_size_checks() {
        let mut config = SemrouterConfig::default();
        config.cache.enabled = false;
        config.cache.max_size = 0;
        config.cache.ttl_seconds = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn enabled_telemetry_needs_http_endpoint() {
        let mut config = SemrouterConfig::default();
        config.data_collection.enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);

        config.data_collection.storage_endpoint = Some("ftp://collector".into());
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);

        config.data_collection.storage_endpoint = Some("http://collector:8080/collect".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = SemrouterConfig::default();
        config.classifier.host = " ".into();
        config.classifier.port = 0;
        config.routing.default_model = String::new();
        config.data_collection.sampling_rate = 2.0;
        config.server.log_level = "loud".into();
        config.monitoring.metrics_path = "metrics".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
    }
}
