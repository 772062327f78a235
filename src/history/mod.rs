//! Conversation turns and the bounded per-session history.

pub mod manager;
pub mod message;

pub use manager::{truncate, ConversationHistory, DEFAULT_MAX_TURNS};
pub use message::{Role, Turn};
