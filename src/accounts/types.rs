//! Records persisted by the account store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered student. The hash is an Argon2id PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// What listings expose: everything but the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            email: user.email.clone(),
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Login Usuário")]
    UserLogin,
    #[serde(rename = "Logout")]
    Logout,
    #[serde(rename = "Cadastro")]
    Registration,
    #[serde(rename = "Remoção")]
    Removal,
    #[serde(rename = "Login Admin")]
    AdminLogin,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserLogin => "Login Usuário",
            AuditAction::Logout => "Logout",
            AuditAction::Registration => "Cadastro",
            AuditAction::Removal => "Remoção",
            AuditAction::AdminLogin => "Login Admin",
        }
    }

    /// Student and administrator logins both count; logouts do not.
    pub fn is_login(&self) -> bool {
        matches!(self, AuditAction::UserLogin | AuditAction::AdminLogin)
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub email: String,
    pub action: AuditAction,
    pub timestamp: DateTime<Utc>,
}

/// One row of the `users` layout description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub cid: u32,
    pub name: &'static str,
    pub kind: &'static str,
    pub not_null: bool,
    pub primary_key: bool,
}

pub const USER_SCHEMA: [ColumnInfo; 4] = [
    ColumnInfo {
        cid: 0,
        name: "email",
        kind: "TEXT",
        not_null: true,
        primary_key: true,
    },
    ColumnInfo {
        cid: 1,
        name: "password_hash",
        kind: "TEXT",
        not_null: true,
        primary_key: false,
    },
    ColumnInfo {
        cid: 2,
        name: "created_at",
        kind: "TIMESTAMP",
        not_null: true,
        primary_key: false,
    },
    ColumnInfo {
        cid: 3,
        name: "last_login",
        kind: "TIMESTAMP",
        not_null: true,
        primary_key: false,
    },
];
