use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Gemini",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One exchanged turn as shown in the message list.
///
/// `content` only ever grows, and only while `in_progress` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Local>,
    pub in_progress: bool,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            content: text.into(),
            created_at: Local::now(),
            in_progress: false,
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: text.into(),
            created_at: Local::now(),
            in_progress: false,
        }
    }

    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            in_progress: true,
            ..Self::assistant(String::new())
        }
    }

    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.role, Role::User)
    }

    #[must_use]
    pub fn time_label(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// A piece of newly generated assistant text. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
}

impl TextFragment {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A committed exchange entry sent back to the model as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

impl HistoryEntry {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Safety,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub const fn add(&mut self, other: &Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub history: Vec<HistoryEntry>,
    pub system_instruction: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    #[must_use]
    pub const fn new(history: Vec<HistoryEntry>) -> Self {
        Self {
            history,
            system_instruction: None,
            temperature: 1.0,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// What a provider yields while streaming one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    TextDelta(String),
    Finished {
        stop_reason: StopReason,
        usage: Option<Usage>,
    },
}

pub type StreamResponse =
    futures::stream::BoxStream<'static, crate::core::error::Result<StreamEvent>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_placeholder_is_empty_and_in_progress() {
        let msg = Message::placeholder();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_empty());
        assert!(msg.in_progress);
    }

    #[test]
    fn test_user_message_never_in_progress() {
        let msg = Message::user("What is Firebase?");
        assert!(msg.is_user());
        assert!(!msg.in_progress);
    }

    #[test]
    fn test_time_label_format() {
        let msg = Message::assistant("hello");
        let label = msg.time_label();
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }

    #[test]
    fn test_usage_add() {
        let mut usage1 = Usage::new(100, 50);
        usage1.add(&Usage::new(20, 30));
        assert_eq!(usage1.input_tokens, 120);
        assert_eq!(usage1.output_tokens, 80);
        assert_eq!(usage1.total(), 200);
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new(vec![HistoryEntry::user("hi")])
            .with_system_instruction("be brief")
            .with_temperature(0.7);

        assert_eq!(request.history.len(), 1);
        assert_eq!(request.system_instruction.as_deref(), Some("be brief"));
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!(request.max_tokens.is_none());
    }
}
