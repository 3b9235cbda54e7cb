// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-generation port for deterministic testing.
//!
//! `MockGenerator` implements `TextGenerator` with scripted replies, so the
//! router can be driven through every degradation path without a model.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use agrox_core::{AgroxError, GenerationRequest, TextGenerator};

/// One scripted outcome of a `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with a generation error carrying this message.
    Fail(String),
    /// Panic inside the port.
    Panic,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }
}

/// A text generator that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, the
/// fallback reply is returned (`"mock response"` unless constructed
/// otherwise). Every request is recorded for later inspection.
pub struct MockGenerator {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<GenerationRequest>>,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Create a mock generator with an empty reply queue.
    pub fn new() -> Self {
        Self::with_fallback(VecDeque::new(), MockReply::text("mock response"))
    }

    /// Create a mock generator pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self::with_fallback(VecDeque::from(replies), MockReply::text("mock response"))
    }

    /// Create a mock generator that answers every call with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::with_fallback(VecDeque::new(), MockReply::text(text))
    }

    /// Create a mock generator whose every call fails.
    pub fn failing() -> Self {
        Self::with_fallback(
            VecDeque::new(),
            MockReply::Fail("mock generator unavailable".to_string()),
        )
    }

    fn with_fallback(replies: VecDeque<MockReply>, fallback: MockReply) -> Self {
        Self {
            replies: Mutex::new(replies),
            fallback,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All requests received so far, in call order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, AgroxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        match self.next_reply().await {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(AgroxError::generation(message)),
            MockReply::Panic => panic!("mock generator panic"),
        }
    }
}
