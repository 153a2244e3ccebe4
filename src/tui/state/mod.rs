mod history;

pub use history::InputHistory;

use crate::core::conversation::Conversation;
use crate::core::turn::TurnEvent;
use crate::core::types::Usage;
use crate::tui::widgets::ScrollState;
use std::time::{Duration, Instant};

/// Banner shown between the transcript and the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    /// The session never came up; chatting is disabled.
    Unavailable(&'a str),
    /// The last turn failed; dismissible.
    Failed(&'a str),
    Info(&'a str),
}

pub struct AppState {
    pub should_quit: bool,
    pub frame: usize,
    pub spinner_frame: usize,
    pub conversation: Conversation,
    pub history: InputHistory,
    pub scroll: ScrollState,
    pub last_usage: Option<Usage>,
    pub session_usage: Usage,

    init_error: Option<String>,
    info: Option<String>,
    spinner_last_update: Option<Instant>,
    request_start: Option<Instant>,
}

impl AppState {
    #[must_use]
    pub fn new(conversation: Conversation) -> Self {
        Self {
            should_quit: false,
            frame: 0,
            spinner_frame: 0,
            conversation,
            history: InputHistory::new(),
            scroll: ScrollState::new(),
            last_usage: None,
            session_usage: Usage::default(),
            init_error: None,
            info: None,
            spinner_last_update: None,
            request_start: None,
        }
    }

    /// State for a session that failed to initialize; stays read-only.
    #[must_use]
    pub fn unavailable(conversation: Conversation, error: impl Into<String>) -> Self {
        Self {
            init_error: Some(error.into()),
            ..Self::new(conversation)
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.update_spinner();
    }

    fn update_spinner(&mut self) {
        const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

        let now = Instant::now();
        match self.spinner_last_update {
            Some(last) if now.duration_since(last) >= SPINNER_INTERVAL => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                self.spinner_last_update = Some(now);
            }
            None => {
                self.spinner_last_update = Some(now);
            }
            _ => {}
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.init_error.is_none()
    }

    #[must_use]
    pub const fn is_processing(&self) -> bool {
        self.conversation.is_streaming()
    }

    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.is_available() && !self.is_processing()
    }

    pub fn begin_request(&mut self) {
        self.request_start = Some(Instant::now());
        self.info = None;
        self.scroll.bottom();
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.request_start.map(|start| start.elapsed())
    }

    /// Feeds a streaming event to the conversation. Events for a turn that
    /// is no longer current are dropped.
    pub fn apply_turn(&mut self, event: &TurnEvent) -> bool {
        if !self.conversation.apply(event) {
            tracing::debug!(placeholder = %event.placeholder(), "Stale turn event dropped");
            return false;
        }

        if event.is_terminal() {
            self.request_start = None;
        }

        if let TurnEvent::Completed {
            usage: Some(usage), ..
        } = event
        {
            self.record_usage(*usage);
        }

        true
    }

    pub const fn record_usage(&mut self, usage: Usage) {
        self.session_usage.add(&usage);
        self.last_usage = Some(usage);
    }

    pub fn show_info(&mut self, text: impl Into<String>) {
        self.info = Some(text.into());
    }

    /// The banner to show, most important first.
    #[must_use]
    pub fn notice(&self) -> Option<Notice<'_>> {
        if let Some(error) = &self.init_error {
            return Some(Notice::Unavailable(error));
        }
        if let Some(error) = self.conversation.last_error() {
            return Some(Notice::Failed(error));
        }
        self.info.as_deref().map(Notice::Info)
    }

    /// Closes the topmost dismissible banner.
    pub fn dismiss_notice(&mut self) -> bool {
        self.conversation.dismiss_error() || self.info.take().is_some()
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.request_start = None;
        self.last_usage = None;
        self.info = None;
        self.scroll.bottom();
    }
}
