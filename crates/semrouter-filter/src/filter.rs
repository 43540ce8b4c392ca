// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request lifecycle driver.
//!
//! The host calls [`RequestFilter::on_request_headers`] once, then
//! [`RequestFilter::on_request_data`] for every body chunk, honoring the
//! returned [`FilterStatus`]. Once the filter reports [`FilterState::Forwarded`]
//! the host takes the (possibly annotated) headers back with
//! [`RequestFilter::into_headers`].

use std::sync::Arc;

use semrouter_core::{RequestHeaderMap, RoutingDecision};
use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::context::SemanticRouter;

pub const HEADER_TARGET_MODEL: &str = "X-Target-Model";
pub const HEADER_CLASSIFICATION: &str = "X-Classification";
pub const HEADER_CONFIDENCE: &str = "X-Confidence";
pub const HEADER_CLASSIFICATION_METHOD: &str = "X-Classification-Method";
pub const HEADER_ROUTING_METHOD: &str = "X-Routing-Method";
pub const ROUTING_METHOD_SEMANTIC: &str = "semantic";

/// What the host should do with the request after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    /// Proceed; forward whatever has been received.
    Continue,
    /// Hold the request until the body is complete.
    StopAndBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FilterState {
    AwaitingHeaders,
    BufferingBody,
    Deciding,
    Forwarded,
}

/// Routing filter for one request.
pub struct RequestFilter<H> {
    router: Arc<SemanticRouter>,
    state: FilterState,
    headers: Option<H>,
    body: Vec<u8>,
    decision: Option<RoutingDecision>,
    cancel: CancellationToken,
}

impl<H: RequestHeaderMap> RequestFilter<H> {
    pub fn new(router: Arc<SemanticRouter>) -> Self {
        Self {
            router,
            state: FilterState::AwaitingHeaders,
            headers: None,
            body: Vec::new(),
            decision: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Token the host can cancel to abandon an in-flight classification.
    ///
    /// The token belongs to this filter; it is not derived from any host
    /// cancellation scope.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// The decision applied to the headers, if any.
    pub fn decision(&self) -> Option<&RoutingDecision> {
        self.decision.as_ref()
    }

    pub fn headers(&self) -> Option<&H> {
        self.headers.as_ref()
    }

    /// Hand the headers back to the host.
    pub fn into_headers(self) -> Option<H> {
        self.headers
    }

    /// Request head arrived. `end_stream` is set when there is no body.
    pub async fn on_request_headers(&mut self, headers: H, end_stream: bool) -> FilterStatus {
        if self.state != FilterState::AwaitingHeaders {
            warn!(state = %self.state, "request headers delivered twice, ignoring");
            return FilterStatus::Continue;
        }

        let eligible = is_eligible(&headers);
        self.headers = Some(headers);
        if !eligible {
            self.state = FilterState::Forwarded;
            return FilterStatus::Continue;
        }

        if end_stream {
            self.decide().await;
            FilterStatus::Continue
        } else {
            self.state = FilterState::BufferingBody;
            FilterStatus::StopAndBuffer
        }
    }

    /// A body chunk arrived. `end_stream` marks the last one.
    pub async fn on_request_data(&mut self, chunk: &[u8], end_stream: bool) -> FilterStatus {
        if self.state != FilterState::BufferingBody {
            return FilterStatus::Continue;
        }

        self.body.extend_from_slice(chunk);
        if !end_stream {
            return FilterStatus::StopAndBuffer;
        }

        self.decide().await;
        FilterStatus::Continue
    }

    async fn decide(&mut self) {
        self.state = FilterState::Deciding;
        let body = std::mem::take(&mut self.body);

        if let Some(decision) = self.router.decide(&body, &self.cancel).await {
            if let Some(headers) = self.headers.as_mut() {
                apply_headers(headers, &decision);
            }
            self.decision = Some(decision);
        }

        self.state = FilterState::Forwarded;
    }
}

/// POST with a JSON content type.
fn is_eligible<H: RequestHeaderMap>(headers: &H) -> bool {
    if !headers.method().eq_ignore_ascii_case("POST") {
        debug!(method = headers.method(), "not a POST, skipping");
        return false;
    }
    let json = headers
        .get("content-type")
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
    if !json {
        debug!("content type is not JSON, skipping");
    }
    json
}

fn apply_headers<H: RequestHeaderMap>(headers: &mut H, decision: &RoutingDecision) {
    headers.set(HEADER_TARGET_MODEL, &decision.model);
    headers.set(HEADER_CLASSIFICATION, &decision.category);
    headers.set(HEADER_CONFIDENCE, &decision.confidence_header());
    headers.set(HEADER_CLASSIFICATION_METHOD, &decision.method.to_string());
    headers.set(HEADER_ROUTING_METHOD, ROUTING_METHOD_SEMANTIC);
}
