//! Post-commit notifications.
//! Spawns a background thread that receives one event per persisted write
//! and hands it to every registered hook, in registration order.

use super::types::AuditAction;
use chrono::{DateTime, Utc};
use std::sync::mpsc::{channel, Sender};
use std::thread;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    pub kind: AuditAction,
    pub email: String,
    pub at: DateTime<Utc>,
}

pub trait CommitHook: Send {
    fn name(&self) -> &str;

    fn on_commit(&mut self, event: &CommitEvent) -> anyhow::Result<()>;
}

/// Stand-in for remote replication: records that a sync would happen.
#[derive(Debug, Default)]
pub struct TracingSyncHook;

impl CommitHook for TracingSyncHook {
    fn name(&self) -> &str {
        "tracing-sync"
    }

    fn on_commit(&mut self, event: &CommitEvent) -> anyhow::Result<()> {
        info!(kind = %event.kind, email = %event.email, at = %event.at, "Store committed, sync point");
        Ok(())
    }
}

/// Fire-and-forget handle. Dropping it drains the queue and joins the worker.
pub struct HookDispatcher {
    tx: Option<Sender<CommitEvent>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl HookDispatcher {
    pub fn spawn(mut hooks: Vec<Box<dyn CommitHook>>) -> Self {
        let (tx, rx) = channel::<CommitEvent>();
        let worker = thread::spawn(move || {
            while let Ok(event) = rx.recv() {
                for hook in hooks.iter_mut() {
                    if let Err(e) = hook.on_commit(&event) {
                        warn!(hook = hook.name(), error = %e, "Commit hook failed");
                    }
                }
            }
            debug!("Commit hook worker stopped");
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn emit(&self, event: CommitEvent) {
        if let Some(tx) = &self.tx {
            // A dead worker only loses notifications, never the write.
            let _ = tx.send(event);
        }
    }
}

impl Drop for HookDispatcher {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Commit hook worker panicked");
            }
        }
    }
}
