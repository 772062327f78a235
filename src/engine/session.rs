//! Per-session conversation state and the store that owns it.
//!
//! Each session exclusively owns its history; nothing is shared between
//! sessions and nothing outlives [`SessionStore::close`].

use super::types::ControllerState;
use crate::history::ConversationHistory;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub type SessionId = Uuid;

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    email: String,
    history: ConversationHistory,
    state: ControllerState,
    opened_at: DateTime<Utc>,
}

impl Session {
    pub fn new(email: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            history: ConversationHistory::new(system_prompt),
            state: ControllerState::Idle,
            opened_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut ConversationHistory {
        &mut self.history
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ControllerState) {
        debug!(session = %self.id, from = ?self.state, to = ?state, "State transition");
        self.state = state;
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// "Limpar conversa": back to the system turn, ready for input.
    pub fn reset(&mut self) {
        self.history.reset();
        self.set_state(ControllerState::Idle);
    }
}

/// Sessions keyed by identifier.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, email: &str, system_prompt: &str) -> SessionId {
        let session = Session::new(email, system_prompt);
        let id = session.id();
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!(session = %id, email = email, "Session opened");
        id
    }

    pub async fn get(&self, id: SessionId) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Drops the session and its history. Returns whether it existed.
    pub async fn close(&self, id: SessionId) -> bool {
        let removed = self.inner.write().await.remove(&id).is_some();
        if removed {
            info!(session = %id, "Session closed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
