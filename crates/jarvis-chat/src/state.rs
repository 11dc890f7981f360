//! Conversation loop lifecycle.
//!
//! - Idle -> Running (greeting spoken, loop started)
//! - Running -> Stopped (exit phrase, interrupt, or end of input)
//! - Idle -> Stopped (interrupted before the loop started)
//!
//! Stopped is terminal. A loop instance runs at most once.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::ConversationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Idle => write!(f, "Idle"),
            LoopState::Running => write!(f, "Running"),
            LoopState::Stopped => write!(f, "Stopped"),
        }
    }
}

impl LoopState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &LoopState) -> bool {
        matches!(
            (self, target),
            (LoopState::Idle, LoopState::Running)
                | (LoopState::Running, LoopState::Stopped)
                | (LoopState::Idle, LoopState::Stopped)
        )
    }
}

/// Shared handle on a loop's state. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<LoopState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LoopState::Idle)),
        }
    }

    pub fn current(&self) -> LoopState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attempt to move to `target`, rejecting transitions the lifecycle forbids.
    pub fn transition(&self, target: LoopState) -> Result<(), ConversationError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.can_transition_to(&target) {
            tracing::debug!("Loop state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(ConversationError::InvalidTransition {
                from: *state,
                to: target,
            })
        }
    }

    pub fn is_running(&self) -> bool {
        self.current() == LoopState::Running
    }
}
