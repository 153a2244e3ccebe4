#![allow(clippy::expect_used)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::core::error::{ChatError, Result};
use crate::core::llm::LLM;
use crate::core::types::{CompletionRequest, StopReason, StreamEvent, StreamResponse, Usage};

/// A scripted reply: text fragments, then either a clean finish or an error.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub fragments: Vec<String>,
    pub failure: Option<String>,
    pub usage: Usage,
}

impl MockReply {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::fragments([text.into()])
    }

    #[must_use]
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            failure: None,
            usage: Usage::new(10, 5),
        }
    }

    /// Ends the stream with a transport error after the scripted fragments.
    #[must_use]
    pub fn fail_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    #[must_use]
    pub const fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    fn into_events(self) -> Vec<Result<StreamEvent>> {
        let mut events: Vec<Result<StreamEvent>> = self
            .fragments
            .into_iter()
            .map(|text| Ok(StreamEvent::TextDelta(text)))
            .collect();

        match self.failure {
            Some(message) => events.push(Err(ChatError::Transport(message))),
            None => events.push(Ok(StreamEvent::Finished {
                stop_reason: StopReason::EndTurn,
                usage: Some(self.usage),
            })),
        }

        events
    }
}

#[derive(Clone)]
pub struct MockLLM {
    name: String,
    model: String,
    replies: Arc<Mutex<Vec<MockReply>>>,
    request_history: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLLM {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            model: "mock-model".to_string(),
            replies: Arc::new(Mutex::new(Vec::new())),
            request_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .expect("MockLLM mutex poisoned")
            .push(reply);
        self
    }

    #[must_use]
    pub fn request_history(&self) -> Vec<CompletionRequest> {
        self.request_history
            .lock()
            .expect("MockLLM mutex poisoned")
            .clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_history
            .lock()
            .expect("MockLLM mutex poisoned")
            .len()
    }

    fn next_reply(&self) -> Result<MockReply> {
        let mut replies = self.replies.lock().expect("MockLLM mutex poisoned");
        if replies.is_empty() {
            Err(ChatError::Transport("MockLLM: No replies queued".to_string()))
        } else {
            Ok(replies.remove(0))
        }
    }
}

impl Default for MockLLM {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLM for MockLLM {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(&self, request: CompletionRequest) -> Result<StreamResponse> {
        self.request_history
            .lock()
            .expect("MockLLM mutex poisoned")
            .push(request);

        let reply = self.next_reply()?;
        Ok(Box::pin(futures::stream::iter(reply.into_events())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HistoryEntry;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_llm_returns_queued_replies() {
        let mock = MockLLM::new()
            .with_reply(MockReply::text("First"))
            .with_reply(MockReply::text("Second"));

        let request = CompletionRequest::new(vec![HistoryEntry::user("test")]);

        let events: Vec<_> = mock.stream(request.clone()).await.unwrap().collect().await;
        assert!(matches!(&events[0], Ok(StreamEvent::TextDelta(t)) if t == "First"));
        assert!(matches!(events[1], Ok(StreamEvent::Finished { .. })));

        let events: Vec<_> = mock.stream(request).await.unwrap().collect().await;
        assert!(matches!(&events[0], Ok(StreamEvent::TextDelta(t)) if t == "Second"));
    }

    #[tokio::test]
    async fn test_mock_llm_error_when_empty() {
        let mock = MockLLM::new();
        let request = CompletionRequest::new(vec![HistoryEntry::user("test")]);
        assert!(mock.stream(request).await.is_err());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_reply_failure_after_fragments() {
        let mock = MockLLM::new().with_reply(MockReply::fragments(["a", "b"]).fail_with("cut"));
        let request = CompletionRequest::new(vec![HistoryEntry::user("test")]);

        let events: Vec<_> = mock.stream(request).await.unwrap().collect().await;
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[2], Err(ChatError::Transport(m)) if m == "cut"));
    }
}
