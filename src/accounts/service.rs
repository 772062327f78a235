//! Registration, login and removal on top of the account store. Every
//! successful write also appends its audit entry and notifies the hooks.

use super::hooks::{CommitEvent, HookDispatcher};
use super::store::{AccountStore, AccountsDocument};
use super::types::{AuditAction, AuditEntry, ColumnInfo, UserRecord, UserSummary, USER_SCHEMA};
use super::AccountError;
use crate::config::AdminSettings;
use crate::security::{admin_matches, hash_password, is_valid_email, verify_password, Argon2Params};
use chrono::Utc;
use tracing::{info, instrument, warn};

pub struct AccountService {
    store: AccountStore,
    params: Argon2Params,
    admin: AdminSettings,
    hooks: Option<HookDispatcher>,
}

impl AccountService {
    pub fn new(store: AccountStore, admin: AdminSettings) -> Self {
        Self {
            store,
            params: Argon2Params::default(),
            admin,
            hooks: None,
        }
    }

    pub fn with_params(mut self, params: Argon2Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_hooks(mut self, hooks: HookDispatcher) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    #[instrument(skip(self, password))]
    pub fn register(&self, email: &str, password: &str) -> Result<UserSummary, AccountError> {
        check_input(email, password)?;
        // Hash outside the lock; Argon2 is the slow part.
        let password_hash = hash_password(password, self.params)?;

        let _lock = self.store.lock()?;
        let mut doc = self.store.read()?;
        if doc.find_user(email).is_some() {
            return Err(AccountError::AlreadyRegistered);
        }

        let now = Utc::now();
        let user = UserRecord {
            email: email.to_string(),
            password_hash,
            created_at: now,
            last_login: now,
        };
        let summary = UserSummary::from(&user);
        doc.insert_user(user);

        self.commit(&mut doc, email, AuditAction::Registration)?;
        info!(email, "User registered");
        Ok(summary)
    }

    /// Unknown e-mail and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<UserSummary, AccountError> {
        check_input(email, password)?;

        let _lock = self.store.lock()?;
        let mut doc = self.store.read()?;
        let Some(user) = doc.find_user(email) else {
            warn!(email, "Login for unknown e-mail");
            return Err(AccountError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash)? {
            warn!(email, "Login with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let now = Utc::now();
        let summary = match doc.find_user_mut(email) {
            Some(user) => {
                user.last_login = now;
                UserSummary::from(&*user)
            }
            None => return Err(AccountError::InvalidCredentials),
        };

        self.commit(&mut doc, email, AuditAction::UserLogin)?;
        info!(email, "User logged in");
        Ok(summary)
    }

    pub fn logout(&self, email: &str) -> Result<(), AccountError> {
        let _lock = self.store.lock()?;
        let mut doc = self.store.read()?;
        self.commit(&mut doc, email, AuditAction::Logout)?;
        info!(email, "User logged out");
        Ok(())
    }

    /// Idempotent: removing an unknown e-mail still records the attempt.
    /// Returns whether a user was actually deleted.
    #[instrument(skip(self))]
    pub fn remove(&self, email: &str) -> Result<bool, AccountError> {
        let _lock = self.store.lock()?;
        let mut doc = self.store.read()?;
        let removed = doc.remove_user(email).is_some();
        self.commit(&mut doc, email, AuditAction::Removal)?;
        info!(email, removed, "User removal");
        Ok(removed)
    }

    #[instrument(skip(self, password))]
    pub fn admin_login(&self, email: &str, password: &str) -> Result<(), AccountError> {
        if !admin_matches(email, password, &self.admin.email, &self.admin.password) {
            warn!(email, "Administrator login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        let _lock = self.store.lock()?;
        let mut doc = self.store.read()?;
        self.commit(&mut doc, email, AuditAction::AdminLogin)?;
        info!(email, "Administrator logged in");
        Ok(())
    }

    pub fn users(&self) -> Result<Vec<UserSummary>, AccountError> {
        Ok(self.store.read()?.users.iter().map(UserSummary::from).collect())
    }

    pub fn emails(&self) -> Result<Vec<String>, AccountError> {
        Ok(self
            .store
            .read()?
            .users
            .into_iter()
            .map(|user| user.email)
            .collect())
    }

    /// Newest first.
    pub fn logs(&self) -> Result<Vec<AuditEntry>, AccountError> {
        let mut logs = self.store.read()?.logs;
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(logs)
    }

    pub fn user_schema(&self) -> &'static [ColumnInfo] {
        &USER_SCHEMA
    }

    /// Caller holds the store lock.
    fn commit(
        &self,
        doc: &mut AccountsDocument,
        email: &str,
        kind: AuditAction,
    ) -> Result<(), AccountError> {
        let at = Utc::now();
        doc.append_log(email, kind, at);
        self.store.write(doc)?;

        if let Some(hooks) = &self.hooks {
            hooks.emit(CommitEvent {
                kind,
                email: email.to_string(),
                at,
            });
        }
        Ok(())
    }
}

fn check_input(email: &str, password: &str) -> Result<(), AccountError> {
    if !is_valid_email(email) {
        return Err(AccountError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(AccountError::EmptyPassword);
    }
    Ok(())
}
