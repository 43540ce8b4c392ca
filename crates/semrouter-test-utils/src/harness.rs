// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end decision tests.
//!
//! `TestHarness` assembles a [`SemanticRouter`] around a [`MockClassifier`]
//! and drives requests through a [`RequestFilter`] the way a host would.

use std::sync::Arc;

use semrouter_config::SemrouterConfig;
use semrouter_core::{RouterError, RoutingDecision};
use semrouter_filter::{FilterState, RequestFilter, SemanticRouter};

use crate::mock_classifier::MockClassifier;
use crate::recording_headers::RecordingHeaders;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    config: SemrouterConfig,
    classifier: Option<MockClassifier>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: SemrouterConfig::default(),
            classifier: None,
        }
    }

    /// Use this classifier instead of the default (`general` at 0.9).
    pub fn with_classifier(mut self, classifier: MockClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.routing.confidence_threshold = threshold;
        self
    }

    pub fn with_default_model(mut self, model: &str) -> Self {
        self.config.routing.default_model = model.to_string();
        self
    }

    pub fn with_mapping(mut self, category: &str, model: &str) -> Self {
        self.config
            .routing
            .model_mapping
            .insert(category.to_string(), model.to_string());
        self
    }

    pub fn with_cache(mut self, enabled: bool, ttl_seconds: u64, max_size: usize) -> Self {
        self.config.cache.enabled = enabled;
        self.config.cache.ttl_seconds = ttl_seconds;
        self.config.cache.max_size = max_size;
        self
    }

    /// Enable telemetry to `endpoint` at the given sampling rate.
    pub fn with_telemetry(mut self, endpoint: &str, sampling_rate: f64) -> Self {
        self.config.data_collection.enabled = true;
        self.config.data_collection.storage_endpoint = Some(endpoint.to_string());
        self.config.data_collection.sampling_rate = sampling_rate;
        self
    }

    pub fn build(self) -> Result<TestHarness, RouterError> {
        let classifier = Arc::new(
            self.classifier
                .unwrap_or_else(|| MockClassifier::answering("general", 0.9)),
        );
        let router = SemanticRouter::with_classifier(&self.config, classifier.clone())?;
        Ok(TestHarness {
            router: Arc::new(router),
            classifier,
            config: self.config,
        })
    }
}

/// Outcome of one request driven through the filter.
#[derive(Debug)]
pub struct FilterRun {
    pub headers: RecordingHeaders,
    pub decision: Option<RoutingDecision>,
    pub state: FilterState,
}

impl FilterRun {
    pub fn header(&self, name: &str) -> Option<&str> {
        semrouter_core::RequestHeaderMap::get(&self.headers, name)
    }
}

/// A router wired to a mock classifier.
pub struct TestHarness {
    pub router: Arc<SemanticRouter>,
    pub classifier: Arc<MockClassifier>,
    pub config: SemrouterConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive a JSON POST with `body` delivered as a single chunk.
    pub async fn send(&self, body: &str) -> FilterRun {
        self.send_with(RecordingHeaders::json_post(), body).await
    }

    /// Drive a request with the given head; the body arrives in one chunk.
    pub async fn send_with(&self, headers: RecordingHeaders, body: &str) -> FilterRun {
        let mut filter = RequestFilter::new(self.router.clone());
        filter.on_request_headers(headers, false).await;
        filter.on_request_data(body.as_bytes(), true).await;
        let state = filter.state();
        let decision = filter.decision().cloned();
        FilterRun {
            headers: filter.into_headers().unwrap_or_default(),
            decision,
            state,
        }
    }

    /// Chat-completions body with one user message.
    pub fn chat_body(prompt: &str) -> String {
        serde_json::json!({
            "model": "auto",
            "messages": [{ "role": "user", "content": prompt }],
        })
        .to_string()
    }
}
