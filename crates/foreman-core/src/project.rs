//! Project and ProjectTask types.

use crate::{ProjectId, ProjectStatus, ProjectTaskId, ProjectTaskStatus, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named multi-step unit of work composed of ProjectTasks with dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier, allocated by the store.
    pub id: ProjectId,

    /// Human-readable project name.
    pub name: String,

    /// Free-text brief describing the overall goal.
    pub brief: String,

    /// Current project status.
    pub status: ProjectStatus,

    /// When the project was created.
    pub created_at: DateTime<Utc>,
}

/// One planned step within a Project; becomes a real Task when dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    /// Unique project-task identifier, allocated by the store.
    pub id: ProjectTaskId,

    /// Project this step belongs to.
    pub project_id: ProjectId,

    /// Short step title.
    pub title: String,

    /// Agent configuration key for the step.
    pub agent_type: String,

    /// The step's own prompt (augmented with project context at dispatch).
    pub prompt: String,

    /// Display order within the project.
    pub position: i64,

    /// Predecessor steps that must be Completed before this one is ready.
    pub depends_on: Vec<ProjectTaskId>,

    /// Current step status.
    pub status: ProjectTaskStatus,

    /// The real Task created when this step executed, if any.
    /// Settable only through the store's dedicated link operation.
    pub task_id: Option<TaskId>,

    /// When the step was created.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new ProjectTask.
#[derive(Debug, Clone)]
pub struct NewProjectTask {
    pub project_id: ProjectId,
    pub title: String,
    pub agent_type: String,
    pub prompt: String,
    pub position: i64,
    pub depends_on: Vec<ProjectTaskId>,
}

impl NewProjectTask {
    /// Create a new step with no dependencies at position 0.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        agent_type: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            agent_type: agent_type.into(),
            prompt: prompt.into(),
            position: 0,
            depends_on: Vec::new(),
        }
    }

    /// Builder method to set the display position.
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    /// Builder method to set the dependency list.
    pub fn with_depends_on(mut self, deps: Vec<ProjectTaskId>) -> Self {
        self.depends_on = deps;
        self
    }
}

impl ProjectTask {
    /// Check if the step is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
