// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `semrouter serve` command implementation.
//!
//! Builds the shared routing context, optionally installs the Prometheus
//! recorder and the classifier health monitor, and runs the gateway until
//! SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use semrouter_config::model::SemrouterConfig;
use semrouter_core::{Classifier, HealthStatus, RouterError};
use semrouter_filter::SemanticRouter;
use semrouter_gateway::{GatewayState, start_server};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs the `semrouter serve` command.
pub async fn run_serve(config: SemrouterConfig) -> Result<(), RouterError> {
    init_tracing(&config.server.log_level);

    info!("starting semrouter serve");

    let router = Arc::new(SemanticRouter::from_config(&config)?);
    let render = install_metrics(&config);

    let cancel = install_signal_handler();

    if config.monitoring.enabled {
        let monitor = HealthMonitor::new(router.classifier().clone());
        let period = Duration::from_secs(config.monitoring.health_check_interval_secs.max(1));
        tokio::spawn(monitor.run(period, cancel.clone()));
        info!(
            interval_secs = period.as_secs(),
            "classifier health monitor started"
        );
    }

    let state = GatewayState::new(router.clone(), &config.server, render)?;
    let result = start_server(
        &config.server,
        &config.monitoring.metrics_path,
        state,
        cancel.clone(),
    )
    .await;

    // Stop background tasks if the server exited on its own.
    cancel.cancel();
    router.shutdown();

    info!("semrouter serve shutdown complete");
    result
}

#[cfg(feature = "prometheus")]
fn install_metrics(config: &SemrouterConfig) -> Option<RenderFn> {
    if !config.monitoring.enabled {
        debug!("prometheus metrics disabled by configuration");
        return None;
    }
    match semrouter_prometheus::PrometheusExporter::install() {
        Ok(exporter) => {
            info!(path = %config.monitoring.metrics_path, "prometheus metrics enabled");
            Some(Arc::new(move || exporter.render()))
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    }
}

#[cfg(not(feature = "prometheus"))]
fn install_metrics(_config: &SemrouterConfig) -> Option<RenderFn> {
    debug!("prometheus support not compiled in");
    None
}

/// Periodically probes the classifier and reports health transitions.
pub(crate) struct HealthMonitor {
    classifier: Arc<dyn Classifier>,
    last: Option<bool>,
}

impl HealthMonitor {
    pub(crate) fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            last: None,
        }
    }

    /// Probe once. Returns whether the classifier reported healthy.
    pub(crate) async fn check(&mut self) -> bool {
        let healthy = match self.classifier.health_check(false).await {
            Ok(reported) => {
                let status = HealthStatus::from_remote(&reported);
                if !status.is_healthy() {
                    debug!(status = %reported, "classifier reported non-healthy status");
                }
                status.is_healthy()
            }
            Err(e) => {
                debug!(error = %e, "classifier health probe failed");
                false
            }
        };

        if self.last != Some(healthy) {
            if healthy {
                info!(classifier = self.classifier.name(), "classifier is healthy");
            } else {
                warn!(
                    classifier = self.classifier.name(),
                    "classifier is unhealthy, requests use the fallback route"
                );
            }
        }
        self.last = Some(healthy);

        #[cfg(feature = "prometheus")]
        semrouter_prometheus::set_classifier_healthy(healthy);

        healthy
    }

    pub(crate) async fn run(mut self, period: Duration, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.check().await;
                }
                _ = cancel.cancelled() => {
                    info!("health monitor shutting down");
                    break;
                }
            }
        }
    }
}

/// Returns a token that is cancelled on SIGINT, or SIGTERM on unix.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
            info!("received SIGINT (Ctrl+C), initiating shutdown");
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received SIGINT (Ctrl+C), initiating shutdown");
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, initiating shutdown");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received Ctrl+C, initiating shutdown");
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("semrouter={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use semrouter_test_utils::MockClassifier;

    use super::*;

    #[tokio::test]
    async fn monitor_tracks_transitions() {
        let classifier = MockClassifier::answering("general", 0.9).into_arc();
        let mut monitor = HealthMonitor::new(classifier.clone());

        assert!(monitor.check().await);
        assert_eq!(monitor.last, Some(true));

        classifier.close();
        assert!(!monitor.check().await);
        assert_eq!(monitor.last, Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn monitor_stops_on_cancel() {
        let classifier = MockClassifier::answering("general", 0.9).into_arc();
        let monitor = HealthMonitor::new(classifier);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(monitor.run(Duration::from_secs(30), cancel.clone()));
        tokio::time::advance(Duration::from_secs(61)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("monitor exits after cancel")
            .unwrap();
    }

    #[tokio::test]
    async fn signal_token_starts_uncancelled() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
    }
}
