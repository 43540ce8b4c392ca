// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier trait implemented by the remote client and by test doubles.

use async_trait::async_trait;

use crate::error::RouterError;
use crate::types::ClassificationResult;

/// A source of semantic classifications.
///
/// Implementations must be safe to share across concurrent requests and must
/// not retry internally; the caller owns any retry or fallback policy.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Classify `text`. `cache_hint` tells the service whether it may answer
    /// from its own cache.
    async fn classify(
        &self,
        text: &str,
        cache_hint: bool,
    ) -> Result<ClassificationResult, RouterError>;

    /// Probe the service. `detailed` requests a deeper check.
    /// Returns the status string reported by the service.
    async fn health_check(&self, detailed: bool) -> Result<String, RouterError>;

    /// Release any held connection. Calls made afterwards fail.
    fn close(&self) {}
}
