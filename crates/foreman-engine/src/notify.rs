//! Status notification fan-out.
//!
//! Adapters (chat transports, web frontends) register listeners to observe
//! task status transitions. Notification is best-effort and
//! non-transactional with respect to store writes: a failing listener is
//! logged and never prevents other listeners from running or the triggering
//! transition from completing.

use async_trait::async_trait;
use thiserror::Error;

use foreman_core::{TaskId, TaskStatus};

/// Error a listener may return; isolated per-subscriber by the engine.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Listener-specific failure (transport down, serialization, ...).
    #[error("{0}")]
    Listener(String),
}

impl NotifyError {
    /// Wrap an arbitrary message.
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener(message.into())
    }
}

/// A subscriber observing task status transitions.
#[async_trait]
pub trait StatusListener: Send + Sync {
    /// Called once per status transition with a short human-readable message
    /// (truncated preview of the prompt, result, or error).
    async fn on_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        message: &str,
    ) -> Result<(), NotifyError>;
}
