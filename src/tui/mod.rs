pub mod app;
pub mod events;
pub mod layout;
pub mod session_runner;
pub mod state;
pub mod widgets;

pub use app::TuiApp;

use crate::config::AppConfig;
use crate::core::error::Result;
use crate::core::session::ChatSession;
use tokio::sync::mpsc;

/// Runs the interactive chat until the user quits.
pub async fn run_tui(session: Result<ChatSession>, config: &AppConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut app = TuiApp::with_event_channels(session, config, event_tx, event_rx)?;
    app.run().await
}
