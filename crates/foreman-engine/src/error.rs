//! Engine errors.
//!
//! The orchestration entry points absorb everything except store failures,
//! which are unexpected and propagate to the caller.

use foreman_store::StoreError;
use thiserror::Error;

/// Errors surfaced by orchestration entry points.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The task store failed; considered fatal, never retried here.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
