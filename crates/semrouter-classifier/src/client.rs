// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-latency client for the remote classification service.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use semrouter_config::model::ClassifierServiceConfig;
use semrouter_core::{ClassificationMethod, ClassificationResult, Classifier, RouterError};
use tokio::time::Instant;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request, Status};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::proto::{ClassificationRequest, HealthCheckRequest, SemanticClassifierServiceClient};

/// Classification service client.
///
/// Every call is bounded by the configured timeout (zero means unbounded) and
/// is attempted exactly once. The connection is opened lazily on first use,
/// so construction must happen inside a Tokio runtime.
pub struct GrpcClassifierClient {
    stub: ArcSwapOption<SemanticClassifierServiceClient>,
    endpoint: String,
    timeout: Option<Duration>,
}

impl GrpcClassifierClient {
    /// Build a client from config. An empty host or zero port is rejected.
    pub fn new(config: &ClassifierServiceConfig) -> Result<Self, RouterError> {
        let host = config.host.trim();
        if host.is_empty() || config.port == 0 {
            return Err(RouterError::InvalidAddress {
                host: config.host.clone(),
                port: config.port,
            });
        }

        let scheme = if config.enable_tls { "https" } else { "http" };
        let uri = format!("{scheme}://{host}:{}", config.port);
        let invalid = || RouterError::InvalidAddress {
            host: config.host.clone(),
            port: config.port,
        };

        let mut endpoint = Endpoint::from_shared(uri.clone()).map_err(|_| invalid())?;
        if config.enable_tls {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_webpki_roots())
                .map_err(|e| RouterError::Transport {
                    message: format!("failed to configure TLS for {uri}"),
                    source: Some(Box::new(e)),
                })?;
        }
        let channel: Channel = endpoint.tcp_nodelay(true).connect_lazy();

        debug!(endpoint = %uri, tls = config.enable_tls, "classifier client created");

        Ok(Self {
            stub: ArcSwapOption::new(Some(Arc::new(SemanticClassifierServiceClient::new(
                channel,
            )))),
            endpoint: uri,
            timeout: (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Release the channel. Later calls fail with a transport error.
    pub fn close(&self) {
        if self.stub.swap(None).is_some() {
            debug!(endpoint = %self.endpoint, "classifier client closed");
        }
    }

    fn stub(&self) -> Result<SemanticClassifierServiceClient, RouterError> {
        self.stub
            .load_full()
            .map(|stub| (*stub).clone())
            .ok_or_else(|| RouterError::Transport {
                message: "classifier client closed".to_string(),
                source: None,
            })
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        request
    }

    async fn bounded<F, T>(&self, call: F) -> Result<T, RouterError>
    where
        F: Future<Output = Result<T, Status>>,
    {
        let outcome = match self.timeout {
            Some(duration) => tokio::time::timeout(duration, call)
                .await
                .map_err(|_| RouterError::Timeout { duration })?,
            None => call.await,
        };
        outcome.map_err(|status| status_to_error(status, self.timeout))
    }

    fn timeout_budget_ms(&self) -> i32 {
        self.timeout
            .map(|d| i32::try_from(d.as_millis()).unwrap_or(i32::MAX))
            .unwrap_or(0)
    }
}

#[async_trait]
impl Classifier for GrpcClassifierClient {
    fn name(&self) -> &str {
        "grpc"
    }

    async fn classify(
        &self,
        text: &str,
        cache_hint: bool,
    ) -> Result<ClassificationResult, RouterError> {
        let mut stub = self.stub()?;
        let request_id = new_request_id();
        let request = self.request(ClassificationRequest {
            text: text.to_string(),
            request_id: request_id.clone(),
            cache_enabled: cache_hint,
            timeout_ms: self.timeout_budget_ms(),
        });

        let started = Instant::now();
        let response = self
            .bounded(stub.classify(request))
            .await
            .inspect_err(|e| warn!(request_id = %request_id, error = %e, "classification call failed"))?
            .into_inner();
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        debug!(
            request_id = %request_id,
            category = %response.category,
            confidence = response.confidence,
            model_version = %response.model_version,
            latency_ms,
            "classification received"
        );

        let confidence = if response.confidence.is_finite() {
            response.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(ClassificationResult {
            category: response.category,
            confidence,
            scores: response.scores,
            method: ClassificationMethod::from_remote(&response.method),
            latency_ms,
        })
    }

    async fn health_check(&self, detailed: bool) -> Result<String, RouterError> {
        let mut stub = self.stub()?;
        let check_type = if detailed { "detailed" } else { "basic" };
        let request = self.request(HealthCheckRequest {
            check_type: check_type.to_string(),
        });
        let response = self.bounded(stub.health_check(request)).await?.into_inner();
        debug!(status = %response.status, details = %response.details, "classifier health");
        Ok(response.status)
    }

    fn close(&self) {
        GrpcClassifierClient::close(self);
    }
}

/// Fresh identifier attached to every classification call.
pub fn new_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

fn status_to_error(status: Status, timeout: Option<Duration>) -> RouterError {
    match status.code() {
        Code::DeadlineExceeded => RouterError::Timeout {
            duration: timeout.unwrap_or_default(),
        },
        Code::Cancelled => RouterError::Cancelled,
        Code::Unavailable => RouterError::Transport {
            message: status.message().to_string(),
            source: Some(Box::new(status)),
        },
        // Client-side transport failures surface as Unknown with the
        // underlying error attached.
        Code::Unknown if std::error::Error::source(&status).is_some() => RouterError::Transport {
            message: status.message().to_string(),
            source: Some(Box::new(status)),
        },
        code => RouterError::Remote {
            code: format!("{code:?}"),
            message: status.message().to_string(),
        },
    }
}
