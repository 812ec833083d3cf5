//! Foreman orchestration engine.
//!
//! Coordinates task execution against the run invoker and advances
//! multi-step projects whose tasks form a dependency graph. The engine
//! holds no authoritative state beyond a short-lived in-memory advancement
//! lock per project; everything else lives in the task store.

pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod project;

pub use error::EngineError;
pub use notify::{NotifyError, StatusListener};
pub use orchestrator::Orchestrator;
