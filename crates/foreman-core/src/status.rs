//! Status enums for Tasks, Projects, and ProjectTasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a Task.
///
/// Transitions are monotonic and one-directional:
/// `Pending -> Running -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task created but not yet dispatched.
    #[default]
    Pending,
    /// Task is executing against the external agent process.
    Running,
    /// Task completed successfully.
    Completed,
    /// Task failed (non-zero exit, timeout, or spawn error).
    Failed,
}

impl TaskStatus {
    /// Returns true if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a Project.
///
/// `Draft -> Active -> Completed`; `Archived` is reachable only
/// administratively, never by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Project is being drafted; the only state from which it can be started.
    #[default]
    Draft,
    /// Project has been started and its task graph is advancing.
    Active,
    /// Every project task reached a terminal status.
    Completed,
    /// Shelved administratively.
    Archived,
}

impl ProjectStatus {
    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a ProjectTask within a project's dependency graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectTaskStatus {
    /// Step not yet dispatched; the only state from which it may run.
    #[default]
    Pending,
    /// Step is executing as a real Task.
    Running,
    /// Step completed; unblocks dependents.
    Completed,
    /// Step failed; dependents stay blocked (fail-closed).
    Failed,
    /// Step skipped administratively; terminal, but does not unblock dependents.
    Skipped,
}

impl ProjectTaskStatus {
    /// Returns true if the step is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Skipped)
    }

    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ProjectTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
