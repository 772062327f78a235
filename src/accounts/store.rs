//! JSON document holding users and the audit log.
//!
//! The file is re-read for every operation and replaced atomically on every
//! write. Writers serialize on an exclusive lock over a sidecar `<path>.lock`
//! file, so the chat and admin processes can share one store.

use super::types::{AuditAction, AuditEntry, UserRecord};
use super::AccountError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsDocument {
    /// Sorted by e-mail.
    pub users: Vec<UserRecord>,
    pub logs: Vec<AuditEntry>,
    pub next_log_id: u64,
}

impl AccountsDocument {
    pub fn find_user(&self, email: &str) -> Option<&UserRecord> {
        self.position(email).ok().map(|i| &self.users[i])
    }

    pub fn find_user_mut(&mut self, email: &str) -> Option<&mut UserRecord> {
        match self.position(email) {
            Ok(i) => Some(&mut self.users[i]),
            Err(_) => None,
        }
    }

    /// Returns false if the e-mail is already taken.
    pub fn insert_user(&mut self, user: UserRecord) -> bool {
        match self.position(&user.email) {
            Ok(_) => false,
            Err(i) => {
                self.users.insert(i, user);
                true
            }
        }
    }

    pub fn remove_user(&mut self, email: &str) -> Option<UserRecord> {
        self.position(email).ok().map(|i| self.users.remove(i))
    }

    pub fn append_log(&mut self, email: &str, action: AuditAction, timestamp: DateTime<Utc>) {
        self.next_log_id += 1;
        self.logs.push(AuditEntry {
            id: self.next_log_id,
            email: email.to_string(),
            action,
            timestamp,
        });
    }

    fn position(&self, email: &str) -> Result<usize, usize> {
        self.users
            .binary_search_by(|user| user.email.as_str().cmp(email))
    }
}

/// Exclusive write lock on the store. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".lock");
        PathBuf::from(path)
    }

    /// Blocks until no other writer, in this process or another, holds the
    /// store. Hold the guard across the whole read-modify-write.
    pub fn lock(&self) -> Result<StoreLock, AccountError> {
        let lock_path = self.lock_path();
        let io_err = |source| AccountError::Io {
            path: lock_path.clone(),
            source,
        };

        fs::create_dir_all(self.dir()).map_err(io_err)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(io_err)?;
        file.lock_exclusive().map_err(io_err)?;

        Ok(StoreLock { file })
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// A missing file is an empty store.
    pub fn read(&self) -> Result<AccountsDocument, AccountError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AccountsDocument::default()),
            Err(source) => {
                return Err(AccountError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(AccountsDocument::default());
        }

        serde_json::from_str(&content).map_err(|source| AccountError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Temp file in the same directory, then rename over the target.
    /// Callers doing read-modify-write must hold [`AccountStore::lock`].
    pub fn write(&self, doc: &AccountsDocument) -> Result<(), AccountError> {
        let io_err = |source| AccountError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = self.dir();
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, doc)
                .map_err(|e| io_err(std::io::Error::other(e)))?;
            writer.flush().map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(
            path = %self.path.display(),
            users = doc.users.len(),
            logs = doc.logs.len(),
            "Account store persisted"
        );
        Ok(())
    }
}
