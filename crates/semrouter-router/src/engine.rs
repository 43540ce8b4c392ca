// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category-to-model selection.
//!
//! Priority order: low confidence > category mapping > default model.

use std::collections::BTreeMap;

use semrouter_config::model::RoutingConfig;
use tracing::debug;

/// Pure routing policy: (category, confidence) -> target model.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    model_mapping: BTreeMap<String, String>,
    default_model: String,
    threshold: f64,
}

impl RoutingEngine {
    /// Create a routing engine from the `[routing]` config section.
    pub fn new(config: &RoutingConfig) -> Self {
        Self::with_policy(
            config.model_mapping.clone(),
            config.default_model.clone(),
            config.confidence_threshold,
        )
    }

    pub fn with_policy(
        model_mapping: BTreeMap<String, String>,
        default_model: impl Into<String>,
        threshold: f64,
    ) -> Self {
        Self {
            model_mapping,
            default_model: default_model.into(),
            threshold,
        }
    }

    /// Select the upstream model.
    ///
    /// 1. Confidence below the threshold always yields the default model.
    /// 2. A category mapped to a non-empty model yields that model.
    /// 3. Anything else yields the default model.
    pub fn select_model(&self, category: &str, confidence: f64) -> String {
        if confidence < self.threshold {
            debug!(
                category,
                confidence,
                threshold = self.threshold,
                "confidence below threshold, using default model"
            );
            return self.default_model.clone();
        }

        match self.model_mapping.get(category) {
            Some(model) if !model.is_empty() => model.clone(),
            _ => self.default_model.clone(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
