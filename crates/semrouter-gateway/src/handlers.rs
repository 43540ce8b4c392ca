// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers for the gateway: health, metrics, and the forwarding proxy.

use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use semrouter_filter::{FilterStatus, RequestFilter};
use serde::Serialize;
use tracing::{debug, warn};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the classifier answered its probe, else `degraded`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Status string reported by the classifier, or the probe error.
    pub classifier: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health
///
/// Always 200: a classifier outage degrades routing but requests are still
/// forwarded on the fallback route.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let (status, classifier) = match state.router.classifier().health_check(false).await {
        Ok(reported) => ("ok", reported),
        Err(e) => ("degraded", e.to_string()),
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        classifier,
    })
}

/// GET <metrics_path>
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Fallback route: run the routing filter, then forward upstream.
///
/// The body is buffered up to `max_body_bytes` before the filter sees it;
/// the upstream response is streamed back as it arrives.
pub async fn proxy(State(state): State<GatewayState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "failed to read request body");
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        }
    };

    let mut filter = RequestFilter::new(state.router.clone());
    let status = filter.on_request_headers(parts, body.is_empty()).await;
    if status == FilterStatus::StopAndBuffer {
        filter.on_request_data(&body, true).await;
    }
    let Some(parts) = filter.into_headers() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "request head lost");
    };

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{path}", state.upstream_url);

    let mut headers = parts.headers;
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    strip_hop_by_hop(&mut headers);

    let upstream = state
        .http
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    match upstream {
        Ok(resp) => stream_back(resp),
        Err(e) => {
            warn!(error = %e, %url, "upstream request failed");
            error_response(StatusCode::BAD_GATEWAY, "upstream unavailable")
        }
    }
}

fn stream_back(resp: reqwest::Response) -> Response {
    let mut builder = Response::builder().status(resp.status());
    if let Some(headers) = builder.headers_mut() {
        headers.extend(resp.headers().clone());
        strip_hop_by_hop(headers);
    }
    builder
        .body(Body::from_stream(resp.bytes_stream()))
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to build upstream response");
            error_response(StatusCode::BAD_GATEWAY, "invalid upstream response")
        })
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [
        header::CONNECTION,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
        header::TE,
        header::TRAILER,
        header::PROXY_AUTHORIZATION,
    ] {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

