use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::stream::{Stream, StreamExt};
use parking_lot::Mutex;

use super::error::Result;
use super::types::{HistoryEntry, StopReason, StreamEvent, StreamResponse, TextFragment, Usage};

/// Lazy sequence of assistant text for one send.
///
/// Yields fragments in the order the provider produced them and ends after
/// the first error. The exchange is committed to the session history only
/// when the provider stream ends cleanly.
pub struct FragmentStream {
    inner: StreamResponse,
    prompt: String,
    reply: String,
    usage: Option<Usage>,
    stop_reason: Option<StopReason>,
    history: Arc<Mutex<Vec<HistoryEntry>>>,
    done: bool,
}

impl FragmentStream {
    pub(crate) fn new(
        inner: StreamResponse,
        prompt: impl Into<String>,
        history: Arc<Mutex<Vec<HistoryEntry>>>,
    ) -> Self {
        Self {
            inner,
            prompt: prompt.into(),
            reply: String::new(),
            usage: None,
            stop_reason: None,
            history,
            done: false,
        }
    }

    #[must_use]
    pub const fn usage(&self) -> Option<Usage> {
        self.usage
    }

    #[must_use]
    pub const fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Text received so far.
    #[must_use]
    pub fn received(&self) -> &str {
        &self.reply
    }

    fn commit(&mut self) {
        if self.reply.is_empty() {
            tracing::warn!("Stream ended without text, exchange not added to history");
            return;
        }

        let mut history = self.history.lock();
        history.push(HistoryEntry::user(std::mem::take(&mut self.prompt)));
        history.push(HistoryEntry::assistant(self.reply.clone()));
        tracing::debug!(entries = history.len(), "Committed exchange to history");
    }
}

impl Stream for FragmentStream {
    type Item = Result<TextFragment>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.inner.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(StreamEvent::TextDelta(text)))) => {
                    if text.is_empty() {
                        continue;
                    }
                    this.reply.push_str(&text);
                    return Poll::Ready(Some(Ok(TextFragment::new(text))));
                }
                Poll::Ready(Some(Ok(StreamEvent::Finished { stop_reason, usage }))) => {
                    this.stop_reason = Some(stop_reason);
                    if usage.is_some() {
                        this.usage = usage;
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    tracing::warn!(error = %e, received = this.reply.len(), "Stream interrupted");
                    return Poll::Ready(Some(Err(e.into_transport())));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    this.commit();
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl std::fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStream")
            .field("received", &self.reply.len())
            .field("usage", &self.usage)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
