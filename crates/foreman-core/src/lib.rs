//! Foreman Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network
//! - Database
//! - Runtime specifics
//!
//! All types here represent the core business domain of Foreman.

pub mod agent;
pub mod ids;
pub mod project;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use agent::{AgentConfig, ConversationEntry, Role, DEFAULT_TIMEOUT_SECS};
pub use ids::{ProjectId, ProjectTaskId, TaskId};
pub use project::{NewProjectTask, Project, ProjectTask};
pub use status::{ProjectStatus, ProjectTaskStatus, TaskStatus};
pub use task::{NewTask, Task};
