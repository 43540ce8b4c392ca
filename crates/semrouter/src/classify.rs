// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `semrouter classify` command implementation.

use semrouter_config::model::SemrouterConfig;
use semrouter_core::RoutingDecision;
use semrouter_filter::SemanticRouter;
use tokio_util::sync::CancellationToken;

/// Runs the full decision pipeline once and prints the decision as JSON.
/// Returns the process exit code.
pub async fn run_classify(config: &SemrouterConfig, text: &str) -> i32 {
    let router = match SemanticRouter::from_config(config) {
        Ok(router) => router,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let decision = decide_text(&router, text).await;
    router.shutdown();

    let Some(decision) = decision else {
        eprintln!("error: nothing to classify, the text is empty");
        return 1;
    };
    match serde_json::to_string_pretty(&decision) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to serialize decision: {e}");
            1
        }
    }
}

/// Wrap `text` as a completion request and route it.
pub(crate) async fn decide_text(router: &SemanticRouter, text: &str) -> Option<RoutingDecision> {
    let body = serde_json::json!({ "prompt": text }).to_string();
    router.decide(body.as_bytes(), &CancellationToken::new()).await
}
