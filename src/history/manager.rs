//! Bounded conversation history that always keeps its leading system turn.

use super::message::{Role, Turn};

/// Number of non-system turns kept when nothing else is configured.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Keep the system turn plus the most recent `max_turns` entries.
///
/// Histories with at most `max_turns + 1` entries come back unchanged.
pub fn truncate(history: &[Turn], max_turns: usize) -> Vec<Turn> {
    if history.len() <= max_turns + 1 {
        return history.to_vec();
    }

    let mut kept = Vec::with_capacity(max_turns + 1);
    kept.push(history[0].clone());
    kept.extend_from_slice(&history[history.len() - max_turns..]);
    kept
}

/// Ordered turns of one session. Never empty; index 0 is the system turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true: the system turn is always present.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn system_turn(&self) -> &Turn {
        &self.turns[0]
    }

    pub fn last(&self) -> &Turn {
        // Non-empty by construction.
        &self.turns[self.turns.len() - 1]
    }

    /// Turns shown to the user, i.e. everything but the system turn.
    pub fn visible(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|turn| turn.role() != Role::System)
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    pub fn truncate(&mut self, max_turns: usize) {
        if self.turns.len() > max_turns + 1 {
            self.turns = truncate(&self.turns, max_turns);
        }
    }

    /// Back to the single system turn the session started with.
    pub fn reset(&mut self) {
        self.turns.truncate(1);
    }
}
