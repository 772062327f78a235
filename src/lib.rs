//! Excel formula assistant for construction-industry students.
//!
//! A question flows through [`engine::ConversationController`]: it is appended
//! to the session history, the truncated history goes to the completion
//! service, and the reply is sanitized, split into its four numbered sections
//! and revealed paragraph by paragraph.

pub mod accounts;
pub mod cli;
mod commands;
pub mod config;
pub mod engine;
pub mod history;
pub mod llm;
pub mod logging;
pub mod postprocessing;
pub mod preprocessing;
pub mod prompt;
pub mod security;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use anyhow::Context;
use clap::Parser;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Invalid configuration")?;
    logging::init(&config.logging.filter);

    match cli.command {
        Commands::Chat => commands::chat(&config).await,
        Commands::Admin(args) => commands::admin(&config, args),
    }
}
