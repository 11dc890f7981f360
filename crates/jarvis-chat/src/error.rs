//! Error types for the conversation loop.

use crate::state::LoopState;

/// Errors from driving a conversation.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("invalid loop transition: {from} -> {to}")]
    InvalidTransition { from: LoopState, to: LoopState },
}
