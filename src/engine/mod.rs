//! Public façade for the engine layer.

pub mod core;
pub mod orchestrator;
pub mod render;
pub mod session;
pub mod traits;
pub mod types;

pub use self::core::parse_input;
pub use orchestrator::{ConversationController, FALLBACK_MESSAGE};
pub use render::{IncrementalRenderer, CURSOR};
pub use session::{Session, SessionId, SessionStore};
pub use traits::Presenter;
pub use types::{ChatCommand, ControllerError, ControllerState, Task, TurnOutcome};

#[cfg(test)]
mod tests;
