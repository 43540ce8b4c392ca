// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client against an in-process tonic server speaking the classifier contract.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use semrouter_classifier::GrpcClassifierClient;
use semrouter_classifier::proto::{
    ClassificationRequest, ClassificationResponse, HealthCheckRequest, HealthCheckResponse,
};
use semrouter_config::model::ClassifierServiceConfig;
use semrouter_core::{ClassificationMethod, Classifier, RouterError};
use tokio::net::TcpListener;
use tonic::codec::ProstCodec;
use tonic::codegen::{Body, BoxFuture, Service, StdError, empty_body, http};
use tonic::server::{Grpc, NamedService, UnaryService};
use tonic::transport::Server;
use tonic::transport::server::TcpIncoming;
use tonic::{Request, Response, Status};

/// What the server saw, shared with the test body.
#[derive(Default)]
struct Seen {
    classify: Mutex<Vec<ClassificationRequest>>,
    health: Mutex<Vec<String>>,
}

#[derive(Clone)]
struct ClassifierService {
    seen: Arc<Seen>,
    health_status: String,
}

impl NamedService for ClassifierService {
    const NAME: &'static str = "classifier.SemanticClassifierService";
}

/// Canned answers keyed on the request text.
fn classify_reply(text: &str) -> Result<ClassificationResponse, Status> {
    let (category, confidence, method) = match text {
        "" => return Err(Status::invalid_argument("text must not be empty")),
        "overconfident" => ("code", 1.7, "cache"),
        "underconfident" => ("finance", -0.2, "fallback"),
        _ => ("math", 0.93, "model"),
    };
    Ok(ClassificationResponse {
        category: category.to_string(),
        confidence,
        scores: HashMap::from([(category.to_string(), 0.93), ("general".to_string(), 0.07)]),
        latency_ms: 4.0,
        method: method.to_string(),
        model_version: "v1".to_string(),
        timestamp: 1_700_000_000,
        cache_key: String::new(),
    })
}

struct ClassifyHandler(Arc<Seen>);

impl UnaryService<ClassificationRequest> for ClassifyHandler {
    type Response = ClassificationResponse;
    type Future = BoxFuture<Response<ClassificationResponse>, Status>;

    fn call(&mut self, request: Request<ClassificationRequest>) -> Self::Future {
        let request = request.into_inner();
        let reply = classify_reply(&request.text);
        self.0.classify.lock().unwrap().push(request);
        Box::pin(async move { reply.map(Response::new) })
    }
}

struct HealthHandler {
    seen: Arc<Seen>,
    status: String,
}

impl UnaryService<HealthCheckRequest> for HealthHandler {
    type Response = HealthCheckResponse;
    type Future = BoxFuture<Response<HealthCheckResponse>, Status>;

    fn call(&mut self, request: Request<HealthCheckRequest>) -> Self::Future {
        let check_type = request.into_inner().check_type;
        self.seen.health.lock().unwrap().push(check_type.clone());
        let response = HealthCheckResponse {
            status: self.status.clone(),
            stats: HashMap::from([("requests".to_string(), "3".to_string())]),
            timestamp: 1_700_000_000,
            details: format!("{check_type} check"),
        };
        Box::pin(async move { Ok(Response::new(response)) })
    }
}

impl<B> Service<http::Request<B>> for ClassifierService
where
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let seen = self.seen.clone();
        match req.uri().path() {
            "/classifier.SemanticClassifierService/Classify" => Box::pin(async move {
                let mut grpc = Grpc::new(ProstCodec::<
                    ClassificationResponse,
                    ClassificationRequest,
                >::default());
                Ok(grpc.unary(ClassifyHandler(seen), req).await)
            }),
            "/classifier.SemanticClassifierService/HealthCheck" => {
                let status = self.health_status.clone();
                Box::pin(async move {
                    let mut grpc = Grpc::new(ProstCodec::<
                        HealthCheckResponse,
                        HealthCheckRequest,
                    >::default());
                    Ok(grpc.unary(HealthHandler { seen, status }, req).await)
                })
            }
            _ => Box::pin(async move {
                Ok(http::Response::builder()
                    .status(200)
                    .header("grpc-status", "12")
                    .header("content-type", "application/grpc")
                    .body(empty_body())
                    .unwrap())
            }),
        }
    }
}

/// Serve the contract on an ephemeral port; returns the port and the log of
/// received requests.
async fn start_service(health_status: &str) -> (u16, Arc<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let incoming = TcpIncoming::from_listener(listener, true, None).unwrap();

    let seen = Arc::new(Seen::default());
    let service = ClassifierService {
        seen: seen.clone(),
        health_status: health_status.to_string(),
    };
    tokio::spawn(
        Server::builder()
            .add_service(service)
            .serve_with_incoming(incoming),
    );
    (port, seen)
}

fn client(port: u16, timeout_ms: u64) -> GrpcClassifierClient {
    GrpcClassifierClient::new(&ClassifierServiceConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_ms,
        enable_tls: false,
    })
    .unwrap()
}

#[tokio::test]
async fn classify_decodes_service_response() {
    let (port, seen) = start_service("healthy").await;
    let client = client(port, 2000);

    let result = client.classify("What is 2+2?", true).await.unwrap();

    assert_eq!(result.category, "math");
    assert_eq!(result.confidence, 0.93);
    assert_eq!(result.method, ClassificationMethod::Model);
    assert_eq!(result.scores["math"], 0.93);
    assert_eq!(result.scores["general"], 0.07);
    // Latency is measured locally, not copied from the response.
    assert!(result.latency_ms >= 0.0);
    assert_ne!(result.latency_ms, 4.0);

    let requests = seen.classify.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "What is 2+2?");
    assert!(requests[0].cache_enabled);
    assert_eq!(requests[0].timeout_ms, 2000);
    assert!(requests[0].request_id.starts_with("req_"));
    assert_eq!(requests[0].request_id.len(), 36);
}

#[tokio::test]
async fn every_call_gets_its_own_request_id() {
    let (port, seen) = start_service("healthy").await;
    let client = client(port, 0);

    client.classify("one", false).await.unwrap();
    client.classify("two", false).await.unwrap();

    let requests = seen.classify.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].request_id, requests[1].request_id);
    assert!(!requests[0].cache_enabled);
    // No deadline configured: the budget sent is zero.
    assert_eq!(requests[0].timeout_ms, 0);
}

#[tokio::test]
async fn confidence_is_clamped_and_method_mapped() {
    let (port, _seen) = start_service("healthy").await;
    let client = client(port, 2000);

    let high = client.classify("overconfident", true).await.unwrap();
    assert_eq!(high.confidence, 1.0);
    assert_eq!(high.method, ClassificationMethod::Cached);

    let low = client.classify("underconfident", true).await.unwrap();
    assert_eq!(low.confidence, 0.0);
    assert_eq!(low.method, ClassificationMethod::Fallback);
}

#[tokio::test]
async fn remote_rejection_is_a_remote_error() {
    let (port, _seen) = start_service("healthy").await;
    let client = client(port, 2000);

    match client.classify("", true).await.unwrap_err() {
        RouterError::Remote { code, message } => {
            assert_eq!(code, "InvalidArgument");
            assert_eq!(message, "text must not be empty");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn health_check_passes_status_through() {
    let (port, seen) = start_service("degraded").await;
    let client = client(port, 2000);

    assert_eq!(client.health_check(true).await.unwrap(), "degraded");
    assert_eq!(client.health_check(false).await.unwrap(), "degraded");

    let checks = seen.health.lock().unwrap().clone();
    assert_eq!(checks, vec!["detailed".to_string(), "basic".to_string()]);
}

#[tokio::test]
async fn closing_stops_further_calls() {
    let (port, seen) = start_service("healthy").await;
    let client = client(port, 2000);

    client.classify("before", true).await.unwrap();
    client.close();
    let err = client.classify("after", true).await.unwrap_err();
    assert_eq!(err.kind(), "transport");
    assert_eq!(seen.classify.lock().unwrap().len(), 1);
}
