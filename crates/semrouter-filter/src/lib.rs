// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-time semantic routing.
//!
//! [`SemanticRouter`] is the shared context (cache, classifier, routing
//! policy, telemetry); [`RequestFilter`] drives one request through
//! headers, body buffering, and the routing decision.

pub mod context;
pub mod filter;
pub mod fingerprint;
pub mod telemetry;

pub use context::SemanticRouter;
pub use filter::{
    FilterState, FilterStatus, HEADER_CLASSIFICATION, HEADER_CLASSIFICATION_METHOD,
    HEADER_CONFIDENCE, HEADER_ROUTING_METHOD, HEADER_TARGET_MODEL, RequestFilter,
};
pub use fingerprint::fingerprint;
pub use telemetry::{TelemetryDispatcher, TelemetryEvent};
