//! Store errors.

use foreman_core::{ProjectId, ProjectTaskId, TaskId};
use thiserror::Error;

/// Errors returned by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Update targeted a task that does not exist.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Update targeted a project that does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Update targeted a project task that does not exist.
    #[error("Project task not found: {0}")]
    ProjectTaskNotFound(ProjectTaskId),

    /// A `depends_on` id does not name a project task of the same project.
    #[error("Unknown dependency {dependency} for project {project}")]
    UnknownDependency {
        project: ProjectId,
        dependency: ProjectTaskId,
    },

    /// Backend-specific failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}
