// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sampled, fire-and-forget reporting of routing decisions.
//!
//! Delivery runs on its own task with its own deadline. Failures are logged
//! and counted, never returned to the request path. Prompt text is never
//! part of the payload.

use std::collections::HashMap;
use std::time::Duration;

use semrouter_config::model::DataCollectionConfig;
use semrouter_core::{ClassificationMethod, ClassificationResult, RouterError, RoutingDecision};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// JSON body posted to the collector.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    pub category: String,
    pub confidence: f64,
    pub scores: HashMap<String, f64>,
    pub model: String,
    pub method: ClassificationMethod,
    /// Unix seconds.
    pub timestamp: i64,
}

impl TelemetryEvent {
    pub fn new(result: &ClassificationResult, decision: &RoutingDecision) -> Self {
        Self {
            category: decision.category.clone(),
            confidence: decision.confidence,
            scores: result.scores.clone(),
            model: decision.model.clone(),
            method: decision.method,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Posts sampled [`TelemetryEvent`]s to the configured collector.
#[derive(Debug, Clone)]
pub struct TelemetryDispatcher {
    client: reqwest::Client,
    endpoint: Option<String>,
    sampling_rate: f64,
    timeout: Duration,
}

impl TelemetryDispatcher {
    /// Build a dispatcher. It is inert unless collection is enabled and an
    /// endpoint is configured.
    pub fn new(config: &DataCollectionConfig) -> Result<Self, RouterError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RouterError::Telemetry {
                message: "failed to build telemetry HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        let endpoint = if config.enabled {
            config.storage_endpoint.clone().filter(|e| !e.trim().is_empty())
        } else {
            None
        };

        Ok(Self {
            client,
            endpoint,
            sampling_rate: config.sampling_rate.clamp(0.0, 1.0),
            timeout,
        })
    }

    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
            sampling_rate: 0.0,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        self.endpoint.is_some() && self.sampling_rate > 0.0
    }

    /// Report a decision if it is sampled.
    ///
    /// Returns the delivery task handle so callers that care (tests) can
    /// await it; the request path drops it.
    pub fn dispatch(
        &self,
        result: &ClassificationResult,
        decision: &RoutingDecision,
    ) -> Option<JoinHandle<()>> {
        let endpoint = self.endpoint.clone()?;
        if rand::random::<f64>() >= self.sampling_rate {
            return None;
        }

        let event = TelemetryEvent::new(result, decision);
        let client = self.client.clone();
        let timeout = self.timeout;

        Some(tokio::spawn(async move {
            match tokio::time::timeout(timeout, send(&client, &endpoint, &event)).await {
                Ok(Ok(())) => {
                    semrouter_prometheus::record_telemetry("sent");
                    debug!(category = %event.category, model = %event.model, "telemetry sent");
                }
                Ok(Err(e)) => {
                    semrouter_prometheus::record_telemetry("failed");
                    warn!(error = %e, endpoint = %endpoint, "telemetry delivery failed");
                }
                Err(_) => {
                    semrouter_prometheus::record_telemetry("timeout");
                    warn!(
                        timeout_ms = timeout.as_millis() as u64,
                        endpoint = %endpoint,
                        "telemetry delivery timed out"
                    );
                }
            }
        }))
    }
}

async fn send(
    client: &reqwest::Client,
    endpoint: &str,
    event: &TelemetryEvent,
) -> Result<(), RouterError> {
    let to_error = |e: reqwest::Error| RouterError::Telemetry {
        message: e.to_string(),
        source: Some(Box::new(e)),
    };
    client
        .post(endpoint)
        .json(event)
        .send()
        .await
        .map_err(to_error)?
        .error_for_status()
        .map_err(to_error)?;
    Ok(())
}
