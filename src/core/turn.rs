use futures::StreamExt;

use super::conversation::{Conversation, PendingTurn};
use super::error::ChatError;
use super::session::ChatSession;
use super::types::{MessageId, TextFragment, Usage};

/// Progress of one streamed reply, addressed to its placeholder.
#[derive(Debug)]
pub enum TurnEvent {
    Fragment {
        placeholder: MessageId,
        fragment: TextFragment,
    },
    Completed {
        placeholder: MessageId,
        usage: Option<Usage>,
    },
    Failed {
        placeholder: MessageId,
        error: ChatError,
    },
}

impl TurnEvent {
    #[must_use]
    pub const fn placeholder(&self) -> MessageId {
        match self {
            Self::Fragment { placeholder, .. }
            | Self::Completed { placeholder, .. }
            | Self::Failed { placeholder, .. } => *placeholder,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Fragment { .. })
    }
}

/// Pulls the reply for `turn` and reports each step through `emit`.
/// Exactly one terminal event is emitted.
pub async fn stream_turn(
    session: &ChatSession,
    turn: &PendingTurn,
    mut emit: impl FnMut(TurnEvent) + Send,
) {
    let placeholder = turn.placeholder_id;

    let mut stream = match session.send_and_stream(&turn.text).await {
        Ok(stream) => stream,
        Err(error) => {
            emit(TurnEvent::Failed { placeholder, error });
            return;
        }
    };

    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => emit(TurnEvent::Fragment {
                placeholder,
                fragment,
            }),
            Err(error) => {
                emit(TurnEvent::Failed { placeholder, error });
                return;
            }
        }
    }

    emit(TurnEvent::Completed {
        placeholder,
        usage: stream.usage(),
    });
}

/// Runs a full turn against `conversation` without a UI loop.
///
/// Returns the usage reported for the turn, `None` when the input was
/// rejected or the provider did not report any.
pub async fn drive_turn(
    conversation: &mut Conversation,
    session: &ChatSession,
    text: &str,
) -> Option<Usage> {
    let turn = conversation.submit(text)?;
    let mut usage = None;

    stream_turn(session, &turn, |event| {
        if let TurnEvent::Completed { usage: u, .. } = &event {
            usage = *u;
        }
        conversation.apply(&event);
    })
    .await;

    usage
}
