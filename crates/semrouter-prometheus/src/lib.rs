// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for the semrouter decision layer.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Metrics are
//! rendered as Prometheus text through [`PrometheusExporter::render`], which
//! the gateway serves on the configured metrics path.

pub mod recording;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use semrouter_core::RouterError;

pub use recording::{
    record_cache_lookup, record_classifier_error, record_classifier_latency, record_decision,
    record_telemetry, register_metrics, set_classifier_healthy,
};

/// Owns the handle of the process-wide Prometheus recorder.
#[derive(Clone)]
pub struct PrometheusExporter {
    handle: PrometheusHandle,
}

impl PrometheusExporter {
    /// Install the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn install() -> Result<Self, RouterError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            RouterError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        register_metrics();
        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Wrap an existing handle, e.g. from a locally built recorder in tests.
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[cfg(test)]
mod tests {
    use semrouter_core::ClassificationMethod;

    use super::*;

    #[test]
    fn recorded_metrics_render() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let exporter = PrometheusExporter::from_handle(recorder.handle());

        metrics::with_local_recorder(&recorder, || {
            record_decision(ClassificationMethod::Cached, "qwen-math-7b");
            record_cache_lookup(true);
            record_cache_lookup(false);
            record_telemetry("sent");
            set_classifier_healthy(true);
        });

        let text = exporter.render();
        assert!(text.contains(r#"semrouter_decisions_total{method="cached",model="qwen-math-7b"} 1"#));
        assert!(text.contains(r#"semrouter_cache_lookups_total{result="hit"} 1"#));
        assert!(text.contains(r#"semrouter_cache_lookups_total{result="miss"} 1"#));
        assert!(text.contains(r#"semrouter_telemetry_total{outcome="sent"} 1"#));
        assert!(text.contains("semrouter_classifier_healthy 1"));
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_classifier_error("timeout");
        record_classifier_latency(3.5);
    }
}
