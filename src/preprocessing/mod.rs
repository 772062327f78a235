//! Checks a user submission before it reaches the conversation engine.

pub mod cleaner;

pub use cleaner::{Cleaner, CleanerError};
