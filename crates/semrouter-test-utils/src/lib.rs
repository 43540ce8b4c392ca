// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for semrouter integration tests.
//!
//! - [`MockClassifier`] - scripted classifier with call counting
//! - [`RecordingHeaders`] - request head that records header writes
//! - [`TestHarness`] - router + mock classifier + filter driver

pub mod harness;
pub mod mock_classifier;
pub mod recording_headers;

pub use harness::{FilterRun, TestHarness, TestHarnessBuilder};
pub use mock_classifier::{MockClassifier, MockReply};
pub use recording_headers::RecordingHeaders;

#[cfg(test)]
mod tests {
    use semrouter_core::{ClassificationMethod, Classifier, RequestHeaderMap};

    use super::*;

    #[tokio::test]
    async fn scripted_replies_then_default() {
        let mock = MockClassifier::answering("general", 0.5);
        mock.push_reply(MockReply::classify("code", 0.99)).await;
        mock.push_reply(MockReply::Timeout).await;

        let first = mock.classify("a", true).await.unwrap();
        assert_eq!(first.category, "code");
        assert_eq!(first.method, ClassificationMethod::Model);
        assert_eq!(mock.classify("b", true).await.unwrap_err().kind(), "timeout");
        assert_eq!(mock.classify("c", true).await.unwrap().category, "general");
        assert_eq!(mock.calls(), 3);
        assert_eq!(mock.prompts().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn closed_mock_fails_health() {
        let mock = MockClassifier::answering("general", 0.5);
        assert!(mock.health_check(false).await.is_ok());
        mock.close();
        assert!(mock.is_closed());
        assert!(mock.health_check(false).await.is_err());
    }

    #[test]
    fn recording_headers_are_case_insensitive() {
        let mut h = RecordingHeaders::json_post();
        h.set("X-Target-Model", "m");
        assert_eq!(h.get("x-target-model"), Some("m"));
        assert_eq!(h.get("Content-Type"), Some("application/json"));
        assert_eq!(h.writes(), &[("X-Target-Model".to_string(), "m".to_string())]);
    }
}
