// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the semrouter decision layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level semrouter configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the values the plugin ships with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SemrouterConfig {
    /// Remote classification service settings.
    #[serde(default)]
    pub classifier: ClassifierServiceConfig,

    /// Category to model routing policy.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Local classification result cache.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Sampled decision telemetry.
    #[serde(default)]
    pub data_collection: DataCollectionConfig,

    /// Metrics and classifier health monitoring.
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Reference HTTP host settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Remote classification service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierServiceConfig {
    /// Service host name or IP.
    #[serde(default = "default_classifier_host")]
    pub host: String,

    /// Service gRPC port.
    #[serde(default = "default_classifier_port")]
    pub port: u16,

    /// Per-call deadline in milliseconds. 0 disables the deadline.
    #[serde(default = "default_classifier_timeout_ms")]
    pub timeout_ms: u64,

    /// Use TLS for the gRPC channel.
    #[serde(default)]
    pub enable_tls: bool,
}

impl Default for ClassifierServiceConfig {
    fn default() -> Self {
        Self {
            host: default_classifier_host(),
            port: default_classifier_port(),
            timeout_ms: default_classifier_timeout_ms(),
            enable_tls: false,
        }
    }
}

fn default_classifier_host() -> String {
    "semantic-classifier-service.default.svc.cluster.local".to_string()
}

fn default_classifier_port() -> u16 {
    50051
}

fn default_classifier_timeout_ms() -> u64 {
    3000
}

/// Routing policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Category label -> upstream model. An empty model name counts as unmapped.
    #[serde(default = "default_model_mapping")]
    pub model_mapping: BTreeMap<String, String>,

    /// Model used for unmapped categories, low confidence, and fallbacks.
    #[serde(default = "default_default_model")]
    pub default_model: String,

    /// Minimum confidence before a category-specific route is trusted. Range (0, 1].
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            model_mapping: default_model_mapping(),
            default_model: default_default_model(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_model_mapping() -> BTreeMap<String, String> {
    [
        ("math", "qwen-math-7b"),
        ("code", "qwen-code-7b"),
        ("medical", "qwen-medical-7b"),
        ("finance", "qwen-finance-7b"),
        ("general", "qwen-turbo"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_default_model() -> String {
    "qwen-turbo".to_string()
}

fn default_confidence_threshold() -> f64 {
    0.8
}

/// Classification cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Enable the in-memory cache. When false every lookup misses.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Entry lifetime in seconds.
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Maximum number of entries.
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_seconds: default_cache_ttl_seconds(),
            max_size: default_cache_max_size(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_seconds() -> u64 {
    3600
}

fn default_cache_max_size() -> usize {
    10_000
}

/// Sampled telemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataCollectionConfig {
    /// Enable telemetry dispatch.
    #[serde(default)]
    pub enabled: bool,

    /// Probability (0.0-1.0) that a decision is reported.
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,

    /// Collector URL, e.g. `http://data-collector:8080/collect`.
    #[serde(default)]
    pub storage_endpoint: Option<String>,

    /// Deadline for a single telemetry POST in milliseconds.
    #[serde(default = "default_telemetry_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DataCollectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sampling_rate: default_sampling_rate(),
            storage_endpoint: None,
            timeout_ms: default_telemetry_timeout_ms(),
        }
    }
}

fn default_sampling_rate() -> f64 {
    0.1
}

fn default_telemetry_timeout_ms() -> u64 {
    2000
}

/// Metrics and health monitoring configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    /// Install the Prometheus recorder and serve metrics.
    #[serde(default)]
    pub enabled: bool,

    /// HTTP path the metrics are served on.
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Interval between background classifier health probes, in seconds.
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            metrics_path: default_metrics_path(),
            health_check_interval_secs: default_health_check_interval_secs(),
        }
    }
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_health_check_interval_secs() -> u64 {
    30
}

/// Reference HTTP host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the HTTP front binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port the HTTP front binds to.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Upstream base URL requests are forwarded to.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest request body the host will buffer.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_server_port(),
            upstream_url: default_upstream_url(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}
