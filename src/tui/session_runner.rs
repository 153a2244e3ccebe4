use crate::core::conversation::PendingTurn;
use crate::core::session::ChatSession;
use crate::core::turn::stream_turn;
use crate::tui::events::AppEvent;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum SessionCommand {
    Send(PendingTurn),
    Reset,
    Shutdown,
}

/// Owns the chat session off the UI task. Turns run one at a time, in
/// the order they were sent.
pub struct SessionRunner {
    session: ChatSession,
    cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(
        session: ChatSession,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> (Self, mpsc::UnboundedSender<SessionCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let runner = Self {
            session,
            cmd_rx,
            event_tx,
        };
        (runner, cmd_tx)
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                SessionCommand::Send(turn) => self.stream(&turn).await,
                SessionCommand::Reset => self.session.reset(),
                SessionCommand::Shutdown => {
                    tracing::info!("Session runner shutting down");
                    break;
                }
            }
        }
    }

    async fn stream(&self, turn: &PendingTurn) {
        let event_tx = self.event_tx.clone();
        tracing::debug!(placeholder = %turn.placeholder_id, "Streaming turn");

        stream_turn(&self.session, turn, move |event| {
            let _ = event_tx.send(event.into());
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Conversation;
    use crate::core::session::SessionConfig;
    use crate::providers::mock::{MockLLM, MockReply};
    use std::sync::Arc;

    async fn drain_turn(
        rx: &mut mpsc::UnboundedReceiver<AppEvent>,
        conversation: &mut Conversation,
    ) {
        while let Some(AppEvent::Turn(event)) = rx.recv().await {
            let terminal = event.is_terminal();
            conversation.apply(&event);
            if terminal {
                break;
            }
        }
    }

    #[tokio::test]
    async fn streams_turns_into_conversation() {
        let mock = MockLLM::new()
            .with_reply(MockReply::fragments(["Firebase is ", "a platform."]))
            .with_reply(MockReply::text("Yes."));
        let session = ChatSession::new(Arc::new(mock.clone()), SessionConfig::default());

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (runner, cmd_tx) = SessionRunner::new(session, event_tx);
        let handle = tokio::spawn(runner.run());

        let mut conversation = Conversation::new();
        let turn = conversation.submit("What is Firebase?").unwrap();
        cmd_tx.send(SessionCommand::Send(turn)).unwrap();
        drain_turn(&mut event_rx, &mut conversation).await;

        assert_eq!(conversation.messages()[1].content, "Firebase is a platform.");
        assert!(!conversation.is_streaming());

        let turn = conversation.submit("Is it free?").unwrap();
        cmd_tx.send(SessionCommand::Send(turn)).unwrap();
        drain_turn(&mut event_rx, &mut conversation).await;

        let second = &mock.request_history()[1];
        assert_eq!(second.history.len(), 3);

        cmd_tx.send(SessionCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn reset_forgets_history() {
        let mock = MockLLM::new()
            .with_reply(MockReply::text("One."))
            .with_reply(MockReply::text("Two."));
        let session = ChatSession::new(Arc::new(mock.clone()), SessionConfig::default());

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (runner, cmd_tx) = SessionRunner::new(session, event_tx);
        let handle = tokio::spawn(runner.run());

        let mut conversation = Conversation::new();
        let turn = conversation.submit("first").unwrap();
        cmd_tx.send(SessionCommand::Send(turn)).unwrap();
        drain_turn(&mut event_rx, &mut conversation).await;

        conversation.clear();
        cmd_tx.send(SessionCommand::Reset).unwrap();

        let turn = conversation.submit("second").unwrap();
        cmd_tx.send(SessionCommand::Send(turn)).unwrap();
        drain_turn(&mut event_rx, &mut conversation).await;

        assert_eq!(mock.request_history()[1].history.len(), 1);

        drop(cmd_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn failed_turn_reports_once() {
        let mock = MockLLM::new().with_reply(MockReply::fragments(["partial"]).fail_with("reset"));
        let session = ChatSession::new(Arc::new(mock), SessionConfig::default());

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (runner, cmd_tx) = SessionRunner::new(session, event_tx);
        tokio::spawn(runner.run());

        let mut conversation = Conversation::new();
        let turn = conversation.submit("hi").unwrap();
        cmd_tx.send(SessionCommand::Send(turn)).unwrap();
        drain_turn(&mut event_rx, &mut conversation).await;

        assert_eq!(conversation.len(), 1);
        assert!(conversation.last_error().is_some());
    }
}
