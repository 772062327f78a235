//! Student accounts and the audit log, persisted as one JSON document.

pub mod hooks;
pub mod service;
pub mod stats;
pub mod store;
pub mod types;

pub use hooks::{CommitEvent, CommitHook, HookDispatcher, TracingSyncHook};
pub use service::AccountService;
pub use stats::{logins_by_day_csv, users_csv, DayCount, RecentUser, UsageStats};
pub use store::{AccountStore, AccountsDocument, StoreLock};
pub use types::{AuditAction, AuditEntry, ColumnInfo, UserRecord, UserSummary, USER_SCHEMA};

use crate::security::PasswordError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("E-mail inválido.")]
    InvalidEmail,

    #[error("Senha não informada.")]
    EmptyPassword,

    #[error("E-mail já cadastrado.")]
    AlreadyRegistered,

    #[error("E-mail ou senha incorretos.")]
    InvalidCredentials,

    #[error("Account store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Account store at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Password(#[from] PasswordError),
}
