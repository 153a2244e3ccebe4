use super::error::ChatError;
use super::turn::TurnEvent;
use super::types::{Message, MessageId, TextFragment};

/// Where the current turn stands. Both records of a turn are appended in one
/// step, so there is no observable state between sending and streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Streaming {
        user: MessageId,
        placeholder: MessageId,
    },
}

/// Handed to the stream driver after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub user_id: MessageId,
    pub placeholder_id: MessageId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationChange {
    TurnStarted {
        user: MessageId,
        placeholder: MessageId,
    },
    Appended {
        id: MessageId,
        delta: String,
    },
    Completed {
        id: MessageId,
    },
    Failed {
        id: MessageId,
        error: String,
    },
    ErrorDismissed,
    Cleared,
}

type Observer = Box<dyn FnMut(&ConversationChange) + Send>;

/// Ordered message list plus the single pending turn and the transient
/// error slot.
pub struct Conversation {
    messages: Vec<Message>,
    phase: TurnPhase,
    last_error: Option<String>,
    observers: Vec<Observer>,
}

impl Conversation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            phase: TurnPhase::Idle,
            last_error: None,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_greeting(text: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.messages.push(Message::assistant(text));
        conversation
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ConversationChange) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        matches!(self.phase, TurnPhase::Streaming { .. })
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a turn. Blank input and input while another turn is streaming
    /// are ignored.
    pub fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if self.is_streaming() {
            tracing::debug!("Submit ignored, a turn is already streaming");
            return None;
        }

        let user = Message::user(text);
        let placeholder = Message::placeholder();
        let turn = PendingTurn {
            user_id: user.id,
            placeholder_id: placeholder.id,
            text: text.to_string(),
        };

        self.last_error = None;
        self.messages.push(user);
        self.messages.push(placeholder);
        self.phase = TurnPhase::Streaming {
            user: turn.user_id,
            placeholder: turn.placeholder_id,
        };

        tracing::debug!(placeholder = %turn.placeholder_id, "Turn started");
        self.notify(&ConversationChange::TurnStarted {
            user: turn.user_id,
            placeholder: turn.placeholder_id,
        });

        Some(turn)
    }

    pub fn on_fragment(&mut self, placeholder_id: MessageId, fragment: &TextFragment) -> bool {
        if fragment.is_empty() {
            return false;
        }

        let Some(message) = self.in_progress_mut(placeholder_id) else {
            tracing::trace!(placeholder = %placeholder_id, "Ignoring late fragment");
            return false;
        };

        message.content.push_str(&fragment.text);
        self.notify(&ConversationChange::Appended {
            id: placeholder_id,
            delta: fragment.text.clone(),
        });
        true
    }

    pub fn on_complete(&mut self, placeholder_id: MessageId) -> bool {
        let Some(message) = self.in_progress_mut(placeholder_id) else {
            return false;
        };

        message.in_progress = false;
        self.finish_turn(placeholder_id);

        tracing::debug!(placeholder = %placeholder_id, "Turn completed");
        self.notify(&ConversationChange::Completed { id: placeholder_id });
        true
    }

    /// Drops the placeholder together with any partial text.
    pub fn on_failure(&mut self, placeholder_id: MessageId, error: &ChatError) -> bool {
        let Some(index) = self
            .messages
            .iter()
            .position(|m| m.id == placeholder_id && m.in_progress)
        else {
            return false;
        };

        let removed = self.messages.remove(index);
        self.finish_turn(placeholder_id);
        self.last_error = Some(error.to_string());

        tracing::warn!(
            placeholder = %placeholder_id,
            discarded = removed.content.len(),
            error = %error,
            "Turn failed"
        );
        self.notify(&ConversationChange::Failed {
            id: placeholder_id,
            error: error.to_string(),
        });
        true
    }

    pub fn apply(&mut self, event: &TurnEvent) -> bool {
        match event {
            TurnEvent::Fragment {
                placeholder,
                fragment,
            } => self.on_fragment(*placeholder, fragment),
            TurnEvent::Completed { placeholder, .. } => self.on_complete(*placeholder),
            TurnEvent::Failed { placeholder, error } => self.on_failure(*placeholder, error),
        }
    }

    pub fn dismiss_error(&mut self) -> bool {
        if self.last_error.take().is_some() {
            self.notify(&ConversationChange::ErrorDismissed);
            true
        } else {
            false
        }
    }

    /// Empties the list. Events for a turn that was streaming are ignored
    /// from here on.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.phase = TurnPhase::Idle;
        self.last_error = None;
        self.notify(&ConversationChange::Cleared);
    }

    fn in_progress_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id && m.in_progress)
    }

    fn finish_turn(&mut self, placeholder_id: MessageId) {
        if matches!(self.phase, TurnPhase::Streaming { placeholder, .. } if placeholder == placeholder_id)
        {
            self.phase = TurnPhase::Idle;
        }
    }

    fn notify(&mut self, change: &ConversationChange) {
        for observer in &mut self.observers {
            observer(change);
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("messages", &self.messages)
            .field("phase", &self.phase)
            .field("last_error", &self.last_error)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Role;
    use std::sync::{Arc, Mutex};

    fn transport(msg: &str) -> ChatError {
        ChatError::Transport(msg.to_string())
    }

    fn frag(text: &str) -> TextFragment {
        TextFragment::new(text)
    }

    #[test]
    fn submit_appends_user_and_placeholder() {
        let mut conv = Conversation::new();
        let turn = conv.submit("What is Firebase?").unwrap();

        assert_eq!(conv.len(), 2);
        let user = &conv.messages()[0];
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "What is Firebase?");
        assert!(!user.in_progress);

        let placeholder = &conv.messages()[1];
        assert_eq!(placeholder.id, turn.placeholder_id);
        assert_eq!(placeholder.role, Role::Assistant);
        assert!(placeholder.content.is_empty());
        assert!(placeholder.in_progress);
        assert!(conv.is_streaming());
    }

    #[test]
    fn submit_trims_input() {
        let mut conv = Conversation::new();
        let turn = conv.submit("  hello \n").unwrap();
        assert_eq!(turn.text, "hello");
        assert_eq!(conv.messages()[0].content, "hello");
    }

    #[test]
    fn blank_submit_is_noop() {
        let mut conv = Conversation::new();
        let turn = conv.submit("x").unwrap();
        conv.on_failure(turn.placeholder_id, &transport("down"));
        let before = conv.messages().to_vec();

        assert!(conv.submit("").is_none());
        assert!(conv.submit("   ").is_none());

        assert_eq!(conv.messages(), before.as_slice());
        assert_eq!(conv.last_error(), Some("Transport error: down"));
        assert_eq!(conv.phase(), TurnPhase::Idle);
    }

    #[test]
    fn submit_while_streaming_is_rejected() {
        let mut conv = Conversation::new();
        conv.submit("first").unwrap();
        assert!(conv.submit("second").is_none());
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn fragments_accumulate_then_complete() {
        let mut conv = Conversation::new();
        let turn = conv.submit("What is Firebase?").unwrap();
        let id = turn.placeholder_id;

        assert!(conv.on_fragment(id, &frag("Firebase ")));
        assert!(conv.on_fragment(id, &frag("is a ")));
        assert!(conv.on_fragment(id, &frag("backend platform.")));
        assert_eq!(
            conv.get(id).unwrap().content,
            "Firebase is a backend platform."
        );

        assert!(conv.on_complete(id));
        assert!(!conv.get(id).unwrap().in_progress);
        assert_eq!(conv.phase(), TurnPhase::Idle);
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn empty_fragment_is_skipped() {
        let mut conv = Conversation::new();
        let turn = conv.submit("hi").unwrap();
        assert!(!conv.on_fragment(turn.placeholder_id, &frag("")));
        assert!(conv.get(turn.placeholder_id).unwrap().content.is_empty());
    }

    #[test]
    fn late_fragment_after_complete_is_ignored() {
        let mut conv = Conversation::new();
        let turn = conv.submit("hi").unwrap();
        conv.on_fragment(turn.placeholder_id, &frag("done"));
        conv.on_complete(turn.placeholder_id);
        let before = conv.messages().to_vec();

        assert!(!conv.on_fragment(turn.placeholder_id, &frag(" extra")));
        assert!(!conv.on_complete(turn.placeholder_id));
        assert!(!conv.on_failure(turn.placeholder_id, &transport("late")));
        assert_eq!(conv.messages(), before.as_slice());
        assert!(conv.last_error().is_none());
    }

    #[test]
    fn failure_removes_placeholder_with_partial_content() {
        let mut conv = Conversation::with_greeting("Hello!");
        let first = conv.submit("one").unwrap();
        conv.on_fragment(first.placeholder_id, &frag("uno"));
        conv.on_complete(first.placeholder_id);
        assert_eq!(conv.len(), 3);

        let turn = conv.submit("two").unwrap();
        conv.on_fragment(turn.placeholder_id, &frag("Hel"));
        assert_eq!(conv.len(), 5);

        assert!(conv.on_failure(turn.placeholder_id, &transport("reset")));
        // The user message stays, only the placeholder goes.
        assert_eq!(conv.len(), 4);
        assert_eq!(conv.messages()[3].content, "two");
        assert!(conv.get(turn.placeholder_id).is_none());
        assert_eq!(conv.last_error(), Some("Transport error: reset"));
        assert_eq!(conv.phase(), TurnPhase::Idle);

        assert!(!conv.on_fragment(turn.placeholder_id, &frag("lo")));
        assert_eq!(conv.len(), 4);
    }

    #[test]
    fn next_submit_clears_error() {
        let mut conv = Conversation::new();
        let turn = conv.submit("one").unwrap();
        conv.on_failure(turn.placeholder_id, &transport("x"));
        assert!(conv.last_error().is_some());

        conv.submit("two").unwrap();
        assert!(conv.last_error().is_none());
    }

    #[test]
    fn dismiss_error() {
        let mut conv = Conversation::new();
        assert!(!conv.dismiss_error());

        let turn = conv.submit("one").unwrap();
        conv.on_failure(turn.placeholder_id, &transport("x"));
        assert!(conv.dismiss_error());
        assert!(conv.last_error().is_none());
    }

    #[test]
    fn clear_ignores_events_for_dropped_turn() {
        let mut conv = Conversation::new();
        let turn = conv.submit("one").unwrap();
        conv.clear();

        assert!(conv.is_empty());
        assert!(!conv.is_streaming());
        assert!(!conv.on_fragment(turn.placeholder_id, &frag("late")));
        assert!(!conv.on_complete(turn.placeholder_id));
        assert!(conv.submit("two").is_some());
    }

    #[test]
    fn observers_see_every_mutation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut conv = Conversation::new();
        conv.subscribe(move |change| sink.lock().unwrap().push(change.clone()));

        let turn = conv.submit("hi").unwrap();
        conv.on_fragment(turn.placeholder_id, &frag("a"));
        conv.on_fragment(turn.placeholder_id, &frag("b"));
        conv.on_complete(turn.placeholder_id);
        conv.on_fragment(turn.placeholder_id, &frag("late"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(matches!(seen[0], ConversationChange::TurnStarted { .. }));
        assert_eq!(
            seen[1],
            ConversationChange::Appended {
                id: turn.placeholder_id,
                delta: "a".to_string()
            }
        );
        assert!(matches!(seen[3], ConversationChange::Completed { .. }));
    }

    #[test]
    fn apply_dispatches_turn_events() {
        let mut conv = Conversation::new();
        let turn = conv.submit("hi").unwrap();
        let placeholder = turn.placeholder_id;

        assert!(conv.apply(&TurnEvent::Fragment {
            placeholder,
            fragment: frag("yo"),
        }));
        assert!(conv.apply(&TurnEvent::Completed {
            placeholder,
            usage: None,
        }));
        assert_eq!(conv.get(placeholder).unwrap().content, "yo");
    }
}
