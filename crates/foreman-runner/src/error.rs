//! Runner errors.
//!
//! [`crate::invoker::Invoker::run`] never fails; this error type exists for
//! the `quick` convenience path, which callers use when they want an error
//! instead of a result object.

use thiserror::Error;

/// Errors surfaced by the convenience API.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The underlying run produced a failure outcome; the payload is the
    /// process stderr (or the synthesized timeout/spawn message).
    #[error("Agent run failed: {0}")]
    Failed(String),
}
