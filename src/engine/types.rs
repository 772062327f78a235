//! Shared structs.

use crate::llm::RequestError;
use serde::Serialize;
use thiserror::Error;

/// Where a session sits in the question/answer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerState {
    Idle,
    AwaitingInput,
    RequestInFlight,
    Rendering,
    Error,
}

impl ControllerState {
    /// States in which a new question may be accepted.
    pub fn accepts_input(&self) -> bool {
        matches!(self, ControllerState::Idle | ControllerState::AwaitingInput)
    }
}

/// Result of one submitted question.
#[derive(Debug)]
pub enum TurnOutcome {
    Answered { formatted: String },
    /// The completion failed and the fallback message was recorded instead.
    Failed { error: RequestError },
}

impl TurnOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, TurnOutcome::Answered { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Empty submissions are not accepted")]
    EmptySubmission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Chat(String),
    Command(ChatCommand),
}

/// Slash commands understood by the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Clear the conversation back to the system turn.
    Reset,
    Logout,
    Unknown(String),
}
