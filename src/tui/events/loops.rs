use super::{AppEvent, POLL_TIMEOUT, TICK_INTERVAL};
use crate::core::error::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use tokio::sync::mpsc::UnboundedSender;

/// Forwards terminal input until the receiver goes away.
pub async fn terminal_event_loop(tx: UnboundedSender<AppEvent>) -> Result<()> {
    loop {
        if tx.is_closed() {
            break;
        }

        if !event::poll(POLL_TIMEOUT)? {
            tokio::task::yield_now().await;
            continue;
        }

        let app_event = match event::read()? {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                Some(AppEvent::Input(key))
            }
            CrosstermEvent::Paste(text) => Some(AppEvent::Paste(text)),
            CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        };

        if let Some(event) = app_event
            && tx.send(event).is_err()
        {
            break;
        }
    }
    Ok(())
}

pub async fn tick_loop(tx: UnboundedSender<AppEvent>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    }
}
