//! Task types.

use crate::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Task is one external-agent invocation and its lifecycle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier, allocated by the store.
    pub id: TaskId,

    /// Agent configuration key for this task.
    pub agent_type: String,

    /// The prompt sent to the agent process.
    pub prompt: String,

    /// Dispatch priority; higher runs first.
    pub priority: i64,

    /// Current task status.
    pub status: TaskStatus,

    /// Agent output on success.
    pub result: Option<String>,

    /// Error text on failure.
    pub error: Option<String>,

    /// Opaque continuation token enabling multi-turn resumption.
    pub session_id: Option<String>,

    /// Working directory override for the agent process.
    pub working_dir: Option<String>,

    /// Origin of the task: manual, api, cron, telegram, or project.
    pub source: String,

    /// When the task was created.
    pub created_at: DateTime<Utc>,

    /// When the task transitioned to Running. Set exactly once.
    pub started_at: Option<DateTime<Utc>>,

    /// When the task reached a terminal status. Set exactly once.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields required to create a new Task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub agent_type: String,
    pub prompt: String,
    pub priority: i64,
    pub working_dir: Option<String>,
    pub source: String,
}

impl NewTask {
    /// Create a new task submission with default priority and manual source.
    pub fn new(agent_type: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            prompt: prompt.into(),
            priority: 0,
            working_dir: None,
            source: "manual".to_string(),
        }
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Builder method to set the source tag.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl Task {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_builder() {
        let new = NewTask::new("code", "fix the parser")
            .with_priority(5)
            .with_working_dir("/tmp/repo")
            .with_source("api");

        assert_eq!(new.agent_type, "code");
        assert_eq!(new.priority, 5);
        assert_eq!(new.working_dir.as_deref(), Some("/tmp/repo"));
        assert_eq!(new.source, "api");
    }

    #[test]
    fn test_new_task_defaults() {
        let new = NewTask::new("general", "hello");
        assert_eq!(new.priority, 0);
        assert_eq!(new.source, "manual");
        assert!(new.working_dir.is_none());
    }
}
