// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder every call is a
//! no-op, so the decision path records unconditionally.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use semrouter_core::ClassificationMethod;

pub const DECISIONS_TOTAL: &str = "semrouter_decisions_total";
pub const CACHE_LOOKUPS_TOTAL: &str = "semrouter_cache_lookups_total";
pub const CLASSIFIER_LATENCY_MS: &str = "semrouter_classifier_latency_ms";
pub const CLASSIFIER_ERRORS_TOTAL: &str = "semrouter_classifier_errors_total";
pub const TELEMETRY_TOTAL: &str = "semrouter_telemetry_total";
pub const CLASSIFIER_HEALTHY: &str = "semrouter_classifier_healthy";

/// Register all semrouter metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(DECISIONS_TOTAL, "Routing decisions by method and target model");
    describe_counter!(CACHE_LOOKUPS_TOTAL, "Classification cache lookups by result");
    describe_histogram!(
        CLASSIFIER_LATENCY_MS,
        "Classification service round-trip latency in milliseconds"
    );
    describe_counter!(CLASSIFIER_ERRORS_TOTAL, "Failed classification calls by error kind");
    describe_counter!(TELEMETRY_TOTAL, "Telemetry deliveries by outcome");
    describe_gauge!(
        CLASSIFIER_HEALTHY,
        "1 when the last classifier health probe succeeded, else 0"
    );
}

/// Record a routing decision.
pub fn record_decision(method: ClassificationMethod, model: &str) {
    metrics::counter!(
        DECISIONS_TOTAL,
        "method" => method.to_string(),
        "model" => model.to_string()
    )
    .increment(1);
}

/// Record a cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!(CACHE_LOOKUPS_TOTAL, "result" => result).increment(1);
}

/// Record a successful classification call's latency.
pub fn record_classifier_latency(ms: f64) {
    metrics::histogram!(CLASSIFIER_LATENCY_MS).record(ms);
}

/// Record a failed classification call.
pub fn record_classifier_error(kind: &'static str) {
    metrics::counter!(CLASSIFIER_ERRORS_TOTAL, "kind" => kind).increment(1);
}

/// Record a telemetry delivery outcome (`sent`, `failed`, `timeout`).
pub fn record_telemetry(outcome: &'static str) {
    metrics::counter!(TELEMETRY_TOTAL, "outcome" => outcome).increment(1);
}

/// Set the classifier health gauge.
pub fn set_classifier_healthy(healthy: bool) {
    metrics::gauge!(CLASSIFIER_HEALTHY).set(if healthy { 1.0 } else { 0.0 });
}
