// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `semrouter health` command implementation.

use semrouter_config::model::SemrouterConfig;
use semrouter_core::{Classifier, HealthStatus};
use semrouter_filter::SemanticRouter;

/// Probe the classification service and print its status.
/// Exits 0 only when the service reports healthy.
pub async fn run_health(config: &SemrouterConfig, detailed: bool) -> i32 {
    let router = match SemanticRouter::from_config(config) {
        Ok(router) => router,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let (line, code) = probe(router.classifier().as_ref(), detailed).await;
    router.shutdown();
    println!("{line}");
    code
}

pub(crate) async fn probe(classifier: &dyn Classifier, detailed: bool) -> (String, i32) {
    match classifier.health_check(detailed).await {
        Ok(reported) => {
            let code = if HealthStatus::from_remote(&reported).is_healthy() {
                0
            } else {
                1
            };
            (format!("classifier: {reported}"), code)
        }
        Err(e) => (format!("classifier: unreachable ({e})"), 1),
    }
}

#[cfg(test)]
mod tests {
    use semrouter_test_utils::MockClassifier;

    use super::*;

    #[tokio::test]
    async fn healthy_service_exits_zero() {
        let classifier = MockClassifier::answering("general", 0.9);
        let (line, code) = probe(&classifier, true).await;
        assert_eq!(line, "classifier: healthy");
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn unreachable_service_exits_one() {
        let classifier = MockClassifier::answering("general", 0.9);
        classifier.close();
        let (line, code) = probe(&classifier, false).await;
        assert!(line.starts_with("classifier: unreachable"));
        assert_eq!(code, 1);
    }
}
