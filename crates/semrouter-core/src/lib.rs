// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the semrouter decision layer.
//!
//! This crate provides the error type, the shared classification/routing data
//! model, and the trait seams (classifier, host request head) that the rest of
//! the workspace is built on.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RouterError;
pub use traits::{Classifier, RequestHeaderMap};
pub use types::{
    ClassificationMethod, ClassificationResult, FALLBACK_CATEGORY, HealthStatus, RoutingDecision,
};
