// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared per-configuration routing context.

use std::sync::Arc;
use std::time::Duration;

use semrouter_cache::CacheManager;
use semrouter_classifier::GrpcClassifierClient;
use semrouter_config::SemrouterConfig;
use semrouter_core::{
    ClassificationMethod, ClassificationResult, Classifier, FALLBACK_CATEGORY, RouterError,
    RoutingDecision,
};
use semrouter_router::{RoutingEngine, extract_prompt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::fingerprint::fingerprint;
use crate::telemetry::TelemetryDispatcher;

/// Gap between the confidence threshold and the confidence reported for
/// fallback decisions, keeping them strictly below the threshold.
const FALLBACK_CONFIDENCE_MARGIN: f64 = 0.1;

/// Everything one configured instance shares across its requests: one cache,
/// one classifier, the routing policy, and the telemetry sink.
///
/// Construct once, wrap in an `Arc`, and hand a clone to every
/// [`RequestFilter`](crate::RequestFilter).
pub struct SemanticRouter {
    cache: CacheManager<Arc<ClassificationResult>>,
    classifier: Arc<dyn Classifier>,
    engine: RoutingEngine,
    telemetry: TelemetryDispatcher,
    cache_hint: bool,
}

impl SemanticRouter {
    /// Build the context with a gRPC classifier client.
    ///
    /// Fails only on an unusable classifier address or HTTP client setup.
    pub fn from_config(config: &SemrouterConfig) -> Result<Self, RouterError> {
        let client = GrpcClassifierClient::new(&config.classifier)?;
        info!(endpoint = client.endpoint(), "semantic router initialized");
        Self::with_classifier(config, Arc::new(client))
    }

    /// Build the context around an existing classifier.
    pub fn with_classifier(
        config: &SemrouterConfig,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, RouterError> {
        let cache = CacheManager::new(
            config.cache.enabled,
            Duration::from_secs(config.cache.ttl_seconds),
            config.cache.max_size,
        );
        Ok(Self {
            cache,
            classifier,
            engine: RoutingEngine::new(&config.routing),
            telemetry: TelemetryDispatcher::new(&config.data_collection)?,
            cache_hint: config.cache.enabled,
        })
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    pub fn cache(&self) -> &CacheManager<Arc<ClassificationResult>> {
        &self.cache
    }

    pub fn telemetry(&self) -> &TelemetryDispatcher {
        &self.telemetry
    }

    /// Release the classifier connection.
    pub fn shutdown(&self) {
        self.classifier.close();
        self.cache.clear();
    }

    /// Run the decision pipeline over a complete request body.
    ///
    /// Returns `None` when the body carries no usable prompt or `cancel` fired
    /// during classification; the request is then forwarded unrouted.
    pub async fn decide(
        &self,
        body: &[u8],
        cancel: &CancellationToken,
    ) -> Option<RoutingDecision> {
        let Some(prompt) = extract_prompt(body) else {
            debug!(body_len = body.len(), "no usable prompt, forwarding unrouted");
            return None;
        };
        let key = fingerprint(&prompt);

        let result = match self.lookup(&key) {
            Some(hit) => hit,
            None => match self.classify(&prompt, cancel).await {
                Ok(result) => {
                    self.cache.set(key, Arc::new(result.clone()));
                    result
                }
                Err(RouterError::Cancelled) if cancel.is_cancelled() => {
                    debug!(key = %key, "classification abandoned, request cancelled");
                    return None;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        kind = e.kind(),
                        classifier = self.classifier.name(),
                        "classification failed, using fallback route"
                    );
                    semrouter_prometheus::record_classifier_error(e.kind());
                    let decision = self.fallback_decision();
                    semrouter_prometheus::record_decision(decision.method, &decision.model);
                    return Some(decision);
                }
            },
        };

        let model = self.engine.select_model(&result.category, result.confidence);
        let decision = RoutingDecision {
            model,
            category: result.category.clone(),
            confidence: result.confidence,
            method: result.method,
        };
        info!(
            category = %decision.category,
            confidence = decision.confidence,
            method = %decision.method,
            model = %decision.model,
            "routing decision"
        );
        semrouter_prometheus::record_decision(decision.method, &decision.model);
        // The handle is dropped: delivery never holds up the request.
        let _ = self.telemetry.dispatch(&result, &decision);
        Some(decision)
    }

    fn lookup(&self, key: &str) -> Option<ClassificationResult> {
        let hit = self.cache.get(key).map(|cached| cached.as_cached());
        semrouter_prometheus::record_cache_lookup(hit.is_some());
        hit
    }

    async fn classify(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult, RouterError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RouterError::Cancelled),
            result = self.classifier.classify(prompt, self.cache_hint) => result,
        }?;
        semrouter_prometheus::record_classifier_latency(result.latency_ms);
        Ok(result)
    }

    /// Deterministic decision used when classification fails.
    pub fn fallback_decision(&self) -> RoutingDecision {
        RoutingDecision {
            model: self.engine.default_model().to_string(),
            category: FALLBACK_CATEGORY.to_string(),
            confidence: self.engine.threshold() - FALLBACK_CONFIDENCE_MARGIN,
            method: ClassificationMethod::Fallback,
        }
    }
}
