//! Foreman run invoker.
//!
//! Wraps one external Claude CLI call with a fixed-size concurrency
//! limiter, a hard wall-clock timeout, and a structured result. The
//! limiter is the only admission-control mechanism in the system: it
//! bounds simultaneous agent invocations no matter how many tasks are
//! logically queued.

pub mod error;
pub mod invoker;

pub use error::RunnerError;
pub use invoker::{ClaudeRunner, Invoker, OutputFormat, RunOutcome, RunRequest};
