mod loops;

pub use loops::{terminal_event_loop, tick_loop};

use crate::core::turn::TurnEvent;
use crossterm::event::KeyEvent;
use std::time::Duration;

pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Everything the UI loop reacts to, funnelled through one channel.
#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Paste(String),
    Resize(u16, u16),
    Tick,
    Turn(TurnEvent),
}

impl From<TurnEvent> for AppEvent {
    fn from(event: TurnEvent) -> Self {
        Self::Turn(event)
    }
}
