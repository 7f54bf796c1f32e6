//! Mock model transport for testing.
//!
//! Provides a configurable implementation of [`ModelTransport`] that
//! returns queued replies and records every request, so the client and the
//! state machine can be exercised without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::content::{GenerateContentRequest, GenerateContentResponse};
use crate::error::{TransportError, TransportResult};
use crate::transport::ModelTransport;

/// Predefined reply for one transport call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(GenerateContentResponse),
    Failure(TransportError),
}

impl MockReply {
    /// Normal completion with the given text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Response(GenerateContentResponse::from_text(text))
    }

    /// Normal completion with a JSON-serialized body.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::text(value.to_string())
    }

    /// Candidate stopped for a non-normal reason.
    pub fn finished(reason: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Response(GenerateContentResponse::from_text(text).with_finish_reason(reason))
    }

    /// Normal completion without any text.
    pub fn empty() -> Self {
        Self::Response(GenerateContentResponse::default().with_finish_reason("STOP"))
    }

    pub fn failure(error: TransportError) -> Self {
        Self::Failure(error)
    }
}

/// Captured request for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub api_key: String,
    pub model: String,
    pub request: GenerateContentRequest,
}

impl CapturedCall {
    pub fn prompt(&self) -> String {
        self.request.prompt_text()
    }

    pub fn is_schema_constrained(&self) -> bool {
        self.request.response_schema().is_some()
    }
}

/// Mock transport for testing.
///
/// Replies are handed out in order and wrap around once exhausted; with no
/// replies queued every call yields an empty normal completion.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<RwLock<Vec<MockReply>>>,
    reply_index: Arc<AtomicUsize>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call.
    pub fn add_reply(self, reply: MockReply) -> Self {
        self.replies.write().push(reply);
        self
    }

    /// Replace all queued replies.
    pub fn with_replies(self, replies: Vec<MockReply>) -> Self {
        *self.replies.write() = replies;
        self.reply_index.store(0, Ordering::SeqCst);
        self
    }

    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    fn next_reply(&self) -> MockReply {
        let replies = self.replies.read();
        if replies.is_empty() {
            return MockReply::empty();
        }
        let index = self.reply_index.fetch_add(1, Ordering::SeqCst);
        replies
            .get(index % replies.len())
            .cloned()
            .unwrap_or_else(MockReply::empty)
    }
}

#[async_trait]
impl ModelTransport for MockTransport {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> TransportResult<GenerateContentResponse> {
        self.captured_calls.write().push(CapturedCall {
            api_key: api_key.to_string(),
            model: model.to_string(),
            request: request.clone(),
        });

        match self.next_reply() {
            MockReply::Response(response) => Ok(response),
            MockReply::Failure(error) => Err(error),
        }
    }
}
