// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire messages and client stub for `proto/classifier.proto`.
//!
//! Declared by hand so the crate builds without `protoc`. Field tags must
//! stay in sync with the `.proto` file.

use std::collections::HashMap;

use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Code, Request, Response, Status};

#[derive(Clone, PartialEq, prost::Message)]
pub struct ClassificationRequest {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(string, tag = "2")]
    pub request_id: String,
    #[prost(bool, tag = "3")]
    pub cache_enabled: bool,
    #[prost(int32, tag = "4")]
    pub timeout_ms: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ClassificationResponse {
    #[prost(string, tag = "1")]
    pub category: String,
    #[prost(double, tag = "2")]
    pub confidence: f64,
    #[prost(map = "string, double", tag = "3")]
    pub scores: HashMap<String, f64>,
    #[prost(double, tag = "4")]
    pub latency_ms: f64,
    #[prost(string, tag = "5")]
    pub method: String,
    #[prost(string, tag = "6")]
    pub model_version: String,
    #[prost(int64, tag = "7")]
    pub timestamp: i64,
    #[prost(string, tag = "8")]
    pub cache_key: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HealthCheckRequest {
    #[prost(string, tag = "1")]
    pub check_type: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HealthCheckResponse {
    #[prost(string, tag = "1")]
    pub status: String,
    #[prost(map = "string, string", tag = "2")]
    pub stats: HashMap<String, String>,
    #[prost(int64, tag = "3")]
    pub timestamp: i64,
    #[prost(string, tag = "4")]
    pub details: String,
}

const CLASSIFY_PATH: &str = "/classifier.SemanticClassifierService/Classify";
const HEALTH_CHECK_PATH: &str = "/classifier.SemanticClassifierService/HealthCheck";

/// Unary client for `classifier.SemanticClassifierService`.
#[derive(Debug, Clone)]
pub struct SemanticClassifierServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl SemanticClassifierServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn classify(
        &mut self,
        request: Request<ClassificationRequest>,
    ) -> Result<Response<ClassificationResponse>, Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        self.inner
            .unary(request, PathAndQuery::from_static(CLASSIFY_PATH), codec)
            .await
    }

    pub async fn health_check(
        &mut self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        self.inner
            .unary(request, PathAndQuery::from_static(HEALTH_CHECK_PATH), codec)
            .await
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::new(Code::Unavailable, format!("service was not ready: {e}")))
    }
}
