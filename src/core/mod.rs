pub mod conversation;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod session;
pub mod stream;
pub mod turn;
pub mod types;

pub use conversation::{Conversation, ConversationChange, PendingTurn, TurnPhase};
pub use error::{ChatError, Result};
pub use llm::LLM;
pub use session::{ChatSession, SessionConfig, SessionFactory};
pub use stream::FragmentStream;
pub use turn::{drive_turn, stream_turn, TurnEvent};
