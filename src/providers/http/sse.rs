use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use parking_lot::Mutex;

use crate::providers::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub data: String,
}

impl SseEvent {
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Incremental `text/event-stream` decoder.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network chunks decode intact.
pub struct SseParser {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseParser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            data_lines: Vec::new(),
        }
    }

    pub fn process_chunk(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();

        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw[..line_end]);
            let line = line.trim_end_matches('\r');

            if line.is_empty() {
                if let Some(event) = self.dispatch() {
                    events.push(event);
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                let data = data.strip_prefix(' ').unwrap_or(data);
                if data != "[DONE]" {
                    self.data_lines.push(data.to_string());
                }
            }
            // `event:`, `id:`, `retry:` and `:` comment lines carry nothing we use.
        }

        events
    }

    /// Flushes an event left without its blank terminator line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            if let Some(data) = line.trim_end_matches('\r').strip_prefix("data:") {
                self.data_lines
                    .push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
        }
        self.dispatch()
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            return None;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        Some(SseEvent { data })
    }

    pub fn parse_stream<S>(byte_stream: S) -> impl Stream<Item = Result<SseEvent, ProviderError>>
    where
        S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
    {
        let parser = Arc::new(Mutex::new(Self::new()));
        let tail = Arc::clone(&parser);

        let body = byte_stream.flat_map(move |result: Result<Bytes, reqwest::Error>| {
            let events: Vec<Result<SseEvent, ProviderError>> = match result {
                Ok(bytes) => parser
                    .lock()
                    .process_chunk(&bytes)
                    .into_iter()
                    .map(Ok)
                    .collect(),
                Err(e) => vec![Err(ProviderError::StreamError(e.to_string()))],
            };
            futures::stream::iter(events)
        });

        let trailer = futures::stream::once(async move { tail.lock().finish() })
            .filter_map(|event| async move { event.map(Ok) });

        body.chain(trailer)
    }
}

impl Default for SseParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_data_event() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"data: hello world\n\n");

        assert_eq!(events, vec![SseEvent::new("hello world")]);
    }

    #[test]
    fn test_multi_line_data() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"data: line1\ndata: line2\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line1\nline2");
    }

    #[test]
    fn test_multiple_events() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b"data: first\n\ndata: second\n\n");

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].data, "second");
    }

    #[test]
    fn test_chunked_input() {
        let mut parser = SseParser::new();

        assert!(parser.process_chunk(b"data: hel").is_empty());

        let events = parser.process_chunk(b"lo world\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello world");
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let mut parser = SseParser::new();
        let wave = "👋".as_bytes();

        let mut first = b"data: hi ".to_vec();
        first.extend_from_slice(&wave[..2]);
        assert!(parser.process_chunk(&first).is_empty());

        let mut second = wave[2..].to_vec();
        second.extend_from_slice(b"\n\n");
        let events = parser.process_chunk(&second);

        assert_eq!(events[0].data, "hi 👋");
    }

    #[test]
    fn test_crlf_and_ignored_fields() {
        let mut parser = SseParser::new();
        let events = parser.process_chunk(b": keep-alive\r\nevent: x\r\ndata: {\"a\":1}\r\n\r\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, r#"{"a":1}"#);
    }

    #[test]
    fn test_done_sentinel_ignored() {
        let mut parser = SseParser::new();
        assert!(parser.process_chunk(b"data: [DONE]\n\n").is_empty());
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut parser = SseParser::new();
        assert!(parser.process_chunk(b"data: tail").is_empty());
        assert_eq!(parser.finish(), Some(SseEvent::new("tail")));
        assert_eq!(parser.finish(), None);
    }

    #[tokio::test]
    async fn test_parse_stream_includes_trailer() {
        let chunks: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b"data: one\n\n")),
            Ok(Bytes::from_static(b"data: two")),
        ];
        let events: Vec<_> = SseParser::parse_stream(futures::stream::iter(chunks))
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].as_ref().unwrap().data, "two");
    }
}
