//! Input parsing for the chat prompt.

use super::types::{ChatCommand, Task};

pub fn parse_input(text: &str) -> Task {
    let trimmed = text.trim();
    match trimmed.strip_prefix('/') {
        Some(command) => Task::Command(match command.trim().to_lowercase().as_str() {
            "limpar" | "reset" => ChatCommand::Reset,
            "sair" | "logout" => ChatCommand::Logout,
            other => ChatCommand::Unknown(other.to_string()),
        }),
        None => Task::Chat(trimmed.to_string()),
    }
}
