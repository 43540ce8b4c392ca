// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared data model for classification results and routing decisions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Category used when no classification could be obtained.
pub const FALLBACK_CATEGORY: &str = "general";

/// Provenance of a classification: live model call, cache, or fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    /// Fresh answer from the classification service.
    Model,
    /// Deterministic default used when classification failed.
    Fallback,
    /// Reconstructed from the local result cache.
    Cached,
}

impl ClassificationMethod {
    /// Map the free-form method string reported by the classification service.
    ///
    /// The service reports `"cache"` when it answered from its own cache.
    pub fn from_remote(method: &str) -> Self {
        match method.trim().to_ascii_lowercase().as_str() {
            "cache" | "cached" => ClassificationMethod::Cached,
            "fallback" => ClassificationMethod::Fallback,
            _ => ClassificationMethod::Model,
        }
    }
}

/// Result of classifying one prompt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning category label (e.g. "math", "code", "general").
    pub category: String,
    /// Confidence in the winning category (0.0-1.0).
    pub confidence: f64,
    /// Full score distribution, category -> score.
    #[serde(default)]
    pub scores: HashMap<String, f64>,
    /// Where this result came from.
    pub method: ClassificationMethod,
    /// Round-trip time of the classification call; 0 when served from cache.
    pub latency_ms: f64,
}

impl ClassificationResult {
    /// A copy of this result re-labelled as served from cache.
    pub fn as_cached(&self) -> Self {
        Self {
            category: self.category.clone(),
            confidence: self.confidence,
            scores: self.scores.clone(),
            method: ClassificationMethod::Cached,
            latency_ms: 0.0,
        }
    }
}

/// Routing outcome for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    /// Chosen upstream target model.
    pub model: String,
    /// Category copied from the classification.
    pub category: String,
    /// Confidence copied from the classification.
    pub confidence: f64,
    /// Provenance copied from the classification.
    pub method: ClassificationMethod,
}

impl RoutingDecision {
    /// Confidence rendered the way it travels in headers.
    pub fn confidence_header(&self) -> String {
        format!("{:.3}", self.confidence)
    }
}

/// Health reported for the classification service or the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational but reporting issues.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

impl HealthStatus {
    /// Interpret a status string returned by the classification service.
    pub fn from_remote(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "healthy" | "serving" | "ok" => HealthStatus::Healthy,
            "degraded" => HealthStatus::Degraded(status.to_string()),
            _ => HealthStatus::Unhealthy(status.to_string()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}
