mod commands;
mod render;
mod terminal;

pub use commands::{SLASH_COMMANDS, Submission};

use crate::config::AppConfig;
use crate::core::conversation::Conversation;
use crate::core::error::{ChatError, Result};
use crate::core::session::ChatSession;
use crate::tui::events::{AppEvent, terminal_event_loop, tick_loop};
use crate::tui::layout::calculate_layout;
use crate::tui::session_runner::{SessionCommand, SessionRunner};
use crate::tui::state::AppState;
use crate::tui::widgets::{ChatWidget, InputAction, InputWidget};
use crossterm::ExecutableCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use tokio::sync::mpsc;

use commands::{HELP_TEXT, SlashCommand};
use render::{StatusInfo, notice_lines, render_header, render_notice, render_status};
use terminal::{restore_terminal, setup_terminal};

pub struct TuiApp {
    session_tx: Option<mpsc::UnboundedSender<SessionCommand>>,
    model_name: String,
    state: AppState,
    input_widget: InputWidget<'static>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

fn initial_conversation(greeting: &str) -> Conversation {
    let mut conversation = if greeting.trim().is_empty() {
        Conversation::new()
    } else {
        Conversation::with_greeting(greeting)
    };
    conversation.subscribe(|change| tracing::trace!(?change, "Conversation changed"));
    conversation
}

impl TuiApp {
    /// Builds the app around `session`. A failed session still opens the
    /// UI, read-only, with the failure shown and no greeting.
    pub(crate) fn with_event_channels(
        session: Result<ChatSession>,
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<Self> {
        let (state, session_tx, model_name) = match session {
            Ok(session) => {
                let model_name = session.model().to_string();
                tracing::info!(
                    provider = session.provider_name(),
                    model = %model_name,
                    "Chat session ready"
                );

                let (runner, session_tx) = SessionRunner::new(session, event_tx.clone());
                tokio::spawn(runner.run());

                let conversation = initial_conversation(&config.greeting);
                (AppState::new(conversation), Some(session_tx), model_name)
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat session unavailable");
                (
                    AppState::unavailable(initial_conversation(""), e.to_string()),
                    None,
                    config.model.clone(),
                )
            }
        };

        let terminal = setup_terminal()?;

        Ok(Self {
            session_tx,
            model_name,
            state,
            input_widget: InputWidget::new(),
            event_rx,
            event_tx,
            terminal,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let tx1 = self.event_tx.clone();
        let tx2 = self.event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = terminal_event_loop(tx1).await {
                tracing::error!(error = %e, "Terminal event loop failed");
            }
        });

        tokio::spawn(async move {
            tick_loop(tx2).await;
        });

        while !self.state.should_quit {
            self.input_widget.set_locked(!self.state.can_submit());
            self.draw()?;

            if let Some(event) = self.event_rx.recv().await {
                self.handle_event(event);
            }
        }

        if let Some(tx) = &self.session_tx {
            let _ = tx.send(SessionCommand::Shutdown);
        }

        restore_terminal(&mut self.terminal)?;

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let online = self.state.is_available();
        let status = StatusInfo {
            is_processing: self.state.is_processing(),
            elapsed: self.state.elapsed(),
            spinner_frame: self.state.spinner_frame,
            last_usage: self.state.last_usage.as_ref(),
            session_usage: &self.state.session_usage,
        };
        let notice = self.state.notice().map(|n| notice_lines(&n)).unwrap_or_default();
        let spinner_frame = self.state.spinner_frame;

        let model_name = &self.model_name;
        let messages = self.state.conversation.messages();
        let scroll = &mut self.state.scroll;
        let input_widget = &mut self.input_widget;

        self.terminal.draw(|f| {
            let notice_height = u16::try_from(notice.len()).unwrap_or(u16::MAX);
            let layout = calculate_layout(f.area(), notice_height);

            render_header(f.buffer_mut(), layout.header, model_name, online);

            ChatWidget::new(messages, scroll, spinner_frame).render(layout.chat, f.buffer_mut());

            render_notice(f.buffer_mut(), layout.notice, &notice);

            input_widget.render(layout.input, f);

            render_status(f.buffer_mut(), layout.status, &status);
        })?;

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(key) => self.handle_key_input(key),
            AppEvent::Paste(text) => {
                let action = self.input_widget.handle_paste(text);
                self.handle_input_action(action);
            }
            AppEvent::Resize(_w, _h) => {}
            AppEvent::Tick => self.state.tick(),
            AppEvent::Turn(event) => {
                self.state.apply_turn(&event);
            }
        }
    }

    fn handle_key_input(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                if self.input_widget.is_empty() {
                    self.state.quit();
                } else {
                    self.input_widget.clear();
                }
                return;
            }
            KeyCode::Char('d') if ctrl => {
                if self.input_widget.is_empty() {
                    self.state.quit();
                }
                return;
            }
            KeyCode::Char('l') if ctrl => {
                self.clear_conversation();
                return;
            }
            KeyCode::Esc => {
                if self.state.dismiss_notice() {
                    return;
                }
            }
            KeyCode::PageUp => {
                self.state.scroll.page_up();
                return;
            }
            KeyCode::PageDown => {
                self.state.scroll.page_down();
                return;
            }
            KeyCode::Home if ctrl => {
                self.state.scroll.top();
                return;
            }
            KeyCode::End if ctrl => {
                self.state.scroll.bottom();
                return;
            }
            _ => {}
        }

        let action = self.input_widget.handle_key(key);
        self.handle_input_action(action);
    }

    fn handle_input_action(&mut self, action: InputAction) {
        match action {
            InputAction::Continue | InputAction::Clear => {}

            InputAction::Submit(text) => match Submission::classify(&text) {
                Submission::Command(command) => self.handle_slash_command(command),
                Submission::Chat(text) => self.submit(text),
            },

            InputAction::HistoryPrev => {
                let current = self.input_widget.text();
                if let Some(text) = self.state.history.prev(&current) {
                    self.input_widget.set_text(&text);
                }
            }

            InputAction::HistoryNext => match self.state.history.next() {
                Some(text) if !text.is_empty() => self.input_widget.set_text(&text),
                Some(_) => self.input_widget.clear(),
                None => {}
            },
        }
    }

    fn submit(&mut self, text: String) {
        let Some(session_tx) = &self.session_tx else {
            return;
        };
        let Some(turn) = self.state.conversation.submit(&text) else {
            return;
        };

        self.state.history.push(text);
        self.state.begin_request();

        let placeholder = turn.placeholder_id;
        tracing::info!(chars = turn.text.chars().count(), "Message submitted");

        if session_tx.send(SessionCommand::Send(turn)).is_err() {
            tracing::error!("Session runner is gone");
            self.state.conversation.on_failure(
                placeholder,
                &ChatError::Transport("chat session stopped".to_string()),
            );
        }
    }

    fn clear_conversation(&mut self) {
        self.state.clear_conversation();
        if let Some(tx) = &self.session_tx {
            let _ = tx.send(SessionCommand::Reset);
        }
    }

    fn handle_slash_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Help => self.state.show_info(HELP_TEXT),
            SlashCommand::Clear => self.clear_conversation(),
            SlashCommand::Exit => self.state.quit(),
            SlashCommand::Unknown(cmd) => self.state.show_info(format!(
                "Unknown command: {cmd}. Type /help for available commands, or /{cmd} to send it as a message."
            )),
        }
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        use crossterm::event::DisableBracketedPaste;
        let _ = self.terminal.backend_mut().execute(DisableBracketedPaste);
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
    }
}
