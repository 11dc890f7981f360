//! Conversation loop for the assistant.
//!
//! Drives the read, classify, dispatch, respond, log cycle in text or voice
//! mode. The mode is chosen once at startup from the speech capabilities.

pub mod conversation;
pub mod error;
pub mod shutdown;
pub mod state;
pub mod terminal;

pub use conversation::{ConversationLoop, Mode, SessionSummary, StopReason};
pub use error::ConversationError;
pub use shutdown::ShutdownSignal;
pub use state::{LoopState, StateMachine};
pub use terminal::{ScriptedTerminal, StdinTerminal, Terminal};
