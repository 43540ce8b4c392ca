// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable classifier for deterministic tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use semrouter_core::{ClassificationMethod, ClassificationResult, Classifier, RouterError};
use tokio::sync::Mutex;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    Classify { category: String, confidence: f64 },
    TransportError(String),
    Timeout,
}

impl MockReply {
    pub fn classify(category: &str, confidence: f64) -> Self {
        MockReply::Classify {
            category: category.to_string(),
            confidence,
        }
    }
}

/// A classifier that pops replies from a FIFO queue.
///
/// When the queue is empty the default reply is used. Every call is counted
/// and the prompts it saw are recorded.
pub struct MockClassifier {
    replies: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    delay: Duration,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockClassifier {
    /// Always answers with `category` at `confidence`.
    pub fn answering(category: &str, confidence: f64) -> Self {
        Self::with_default(MockReply::classify(category, confidence))
    }

    /// Always fails with a transport error.
    pub fn failing() -> Self {
        Self::with_default(MockReply::TransportError("connection refused".to_string()))
    }

    pub fn with_default(default_reply: MockReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Sleep this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a reply ahead of the default.
    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    async fn classify(
        &self,
        text: &str,
        _cache_hint: bool,
    ) -> Result<ClassificationResult, RouterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(text.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Classify {
                category,
                confidence,
            } => Ok(ClassificationResult {
                scores: HashMap::from([(category.clone(), confidence)]),
                category,
                confidence,
                method: ClassificationMethod::Model,
                latency_ms: self.delay.as_secs_f64() * 1000.0,
            }),
            MockReply::TransportError(message) => Err(RouterError::Transport {
                message,
                source: None,
            }),
            MockReply::Timeout => Err(RouterError::Timeout {
                duration: self.delay,
            }),
        }
    }

    async fn health_check(&self, _detailed: bool) -> Result<String, RouterError> {
        if self.is_closed() {
            return Err(RouterError::Transport {
                message: "classifier client closed".to_string(),
                source: None,
            });
        }
        Ok("healthy".to_string())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
