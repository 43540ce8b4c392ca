// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client behavior against unreachable and unresponsive endpoints.

use std::time::Duration;

use semrouter_classifier::GrpcClassifierClient;
use semrouter_config::model::ClassifierServiceConfig;
use semrouter_core::{Classifier, RouterError};
use tokio::net::TcpListener;

fn config(host: &str, port: u16, timeout_ms: u64) -> ClassifierServiceConfig {
    ClassifierServiceConfig {
        host: host.to_string(),
        port,
        timeout_ms,
        enable_tls: false,
    }
}

/// A listener that accepts connections and never speaks HTTP/2.
async fn silent_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    port
}

#[tokio::test]
async fn empty_host_is_rejected() {
    let err = GrpcClassifierClient::new(&config("  ", 50051, 1000)).err().unwrap();
    assert!(matches!(err, RouterError::InvalidAddress { .. }));
}

#[tokio::test]
async fn zero_port_is_rejected() {
    let err = GrpcClassifierClient::new(&config("localhost", 0, 1000)).err().unwrap();
    assert!(matches!(err, RouterError::InvalidAddress { port: 0, .. }));
}

#[tokio::test]
async fn endpoint_uses_tls_scheme() {
    let mut cfg = config("classifier.example", 443, 1000);
    cfg.enable_tls = true;
    let client = GrpcClassifierClient::new(&cfg).unwrap();
    assert_eq!(client.endpoint(), "https://classifier.example:443");
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // Grab a free port and release it so nothing is listening there.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = GrpcClassifierClient::new(&config("127.0.0.1", port, 2000)).unwrap();
    let err = client.classify("what is 2+2?", true).await.unwrap_err();
    assert!(
        matches!(err, RouterError::Transport { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn unresponsive_service_times_out() {
    let port = silent_server().await;
    let client = GrpcClassifierClient::new(&config("127.0.0.1", port, 200)).unwrap();

    let started = std::time::Instant::now();
    let err = client.classify("hello", false).await.unwrap_err();
    assert!(matches!(err, RouterError::Timeout { .. }), "unexpected error: {err:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn health_check_is_bounded_too() {
    let port = silent_server().await;
    let client = GrpcClassifierClient::new(&config("127.0.0.1", port, 100)).unwrap();
    let err = client.health_check(true).await.unwrap_err();
    assert_eq!(err.kind(), "timeout");
}

#[tokio::test]
async fn zero_timeout_is_cancellable_by_caller() {
    let port = silent_server().await;
    let client = GrpcClassifierClient::new(&config("127.0.0.1", port, 0)).unwrap();
    let outcome =
        tokio::time::timeout(Duration::from_millis(200), client.classify("hello", false)).await;
    assert!(outcome.is_err(), "call without a deadline should still be pending");
}

#[tokio::test]
async fn closed_client_fails_fast() {
    let client = GrpcClassifierClient::new(&config("127.0.0.1", 50051, 1000)).unwrap();
    client.close();
    client.close();
    let err = client.classify("hello", true).await.unwrap_err();
    match err {
        RouterError::Transport { message, .. } => assert!(message.contains("closed")),
        other => panic!("unexpected {other:?}"),
    }
}
