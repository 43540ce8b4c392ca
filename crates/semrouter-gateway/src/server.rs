// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the reference host.

use std::sync::Arc;
use std::time::Instant;

use axum::{Router, routing::get};
use semrouter_config::model::ServerConfig;
use semrouter_core::RouterError;
use semrouter_filter::SemanticRouter;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// State for the health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Prometheus render function, present when monitoring is enabled.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub router: Arc<SemanticRouter>,
    /// Client used to forward requests upstream.
    pub http: reqwest::Client,
    /// Upstream base URL without a trailing slash.
    pub upstream_url: String,
    pub max_body_bytes: usize,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(
        router: Arc<SemanticRouter>,
        config: &ServerConfig,
        prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    ) -> Result<Self, RouterError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RouterError::Transport {
                message: "failed to build upstream HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            router,
            http,
            upstream_url: config.upstream_url.trim_end_matches('/').to_string(),
            max_body_bytes: config.max_body_bytes,
            health: HealthState {
                start_time: Instant::now(),
                prometheus_render,
            },
        })
    }
}

/// Build the route table.
///
/// - GET /health
/// - GET `metrics_path` (only when a Prometheus render function is present)
/// - everything else: run the routing filter and forward upstream
pub fn build_router(state: GatewayState, metrics_path: &str) -> Router {
    let mut app = Router::new().route("/health", get(handlers::get_health));
    if state.health.prometheus_render.is_some() {
        app = app.route(metrics_path, get(handlers::get_metrics));
    }
    app.fallback(handlers::proxy)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    metrics_path: &str,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), RouterError> {
    let app = build_router(state, metrics_path);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RouterError::Transport {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(%addr, upstream = %config.upstream_url, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| RouterError::Transport {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
