//! Task store contract for Foreman.
//!
//! The orchestration engine depends on this trait only; the persistent
//! backing (in-memory, SQLite, ...) is an implementation detail. The crate
//! ships [`MemoryStore`], the reference implementation used by the CLI and
//! every test.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use async_trait::async_trait;

use foreman_core::{
    AgentConfig, ConversationEntry, NewProjectTask, NewTask, Project, ProjectId, ProjectStatus,
    ProjectTask, ProjectTaskId, ProjectTaskStatus, Role, Task, TaskId, TaskStatus,
};

/// Partial update for a Task. Absent fields are left unchanged.
///
/// The store stamps `started_at`/`completed_at` itself when `status`
/// transitions to Running or a terminal state; callers never set timestamps.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub session_id: Option<String>,
}

impl TaskPatch {
    /// Patch that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Builder method to set the result text.
    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Builder method to set the error text.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Builder method to set the continuation token.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Partial update for a Project. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub brief: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    /// Patch that only changes the status.
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Partial update for a ProjectTask. Absent fields are left unchanged.
///
/// There is deliberately no task-link field here: the link to the real Task
/// can only be written through [`TaskStore::link_project_task`].
#[derive(Debug, Clone, Default)]
pub struct ProjectTaskPatch {
    pub title: Option<String>,
    pub prompt: Option<String>,
    pub position: Option<i64>,
    pub depends_on: Option<Vec<ProjectTaskId>>,
    pub status: Option<ProjectTaskStatus>,
}

impl ProjectTaskPatch {
    /// Patch that only changes the status.
    pub fn status(status: ProjectTaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Filter for task listings.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub agent_type: Option<String>,
    pub status: Option<TaskStatus>,
    pub limit: Option<usize>,
}

/// Persistence operations the orchestration core depends on.
///
/// Missing entities are `Ok(None)`; `Err` means the store itself failed and
/// is treated as fatal by callers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    // --- Tasks ---

    /// Create a new Pending task and return its id.
    async fn create_task(&self, new: NewTask) -> Result<TaskId, StoreError>;

    /// Fetch one task.
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Apply a partial update to a task.
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), StoreError>;

    /// List tasks matching the filter, newest first.
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, StoreError>;

    /// All Pending tasks ordered by priority descending, then age ascending.
    async fn pending_tasks(&self) -> Result<Vec<Task>, StoreError>;

    // --- Agents ---

    /// Look up an agent configuration by name.
    async fn get_agent(&self, name: &str) -> Result<Option<AgentConfig>, StoreError>;

    /// Create or replace an agent configuration.
    async fn put_agent(&self, config: AgentConfig) -> Result<(), StoreError>;

    /// List all agent configurations, ordered by name.
    async fn list_agents(&self) -> Result<Vec<AgentConfig>, StoreError>;

    // --- Conversations ---

    /// Append an entry to a task's conversation log.
    async fn add_conversation(
        &self,
        task_id: TaskId,
        role: Role,
        content: &str,
    ) -> Result<(), StoreError>;

    /// Fetch a task's conversation log in insertion order.
    async fn conversation(&self, task_id: TaskId) -> Result<Vec<ConversationEntry>, StoreError>;

    // --- Projects ---

    /// Create a Draft project and return its id.
    async fn create_project(&self, name: &str, brief: &str) -> Result<ProjectId, StoreError>;

    /// Fetch one project.
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Apply a partial update to a project.
    async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), StoreError>;

    /// List projects, optionally filtered by status.
    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, StoreError>;

    /// Delete a project and all of its project tasks.
    async fn delete_project(&self, id: ProjectId) -> Result<(), StoreError>;

    // --- Project tasks ---

    /// Create a Pending project task. Fails if the project does not exist or
    /// any `depends_on` id does not name a project task of the same project.
    async fn create_project_task(
        &self,
        new: NewProjectTask,
    ) -> Result<ProjectTaskId, StoreError>;

    /// Fetch one project task.
    async fn get_project_task(
        &self,
        id: ProjectTaskId,
    ) -> Result<Option<ProjectTask>, StoreError>;

    /// Apply a partial update to a project task. The task-link field is not
    /// patchable; use [`TaskStore::link_project_task`].
    async fn update_project_task(
        &self,
        id: ProjectTaskId,
        patch: ProjectTaskPatch,
    ) -> Result<(), StoreError>;

    /// Atomically claim a Pending project task for dispatch, marking it
    /// Running. Returns false when the step was no longer Pending, so
    /// exactly one of any concurrent dispatchers wins.
    async fn claim_project_task(&self, id: ProjectTaskId) -> Result<bool, StoreError>;

    /// Link a project task to the real Task executing it, updating status in
    /// the same write.
    async fn link_project_task(
        &self,
        id: ProjectTaskId,
        task_id: TaskId,
        status: ProjectTaskStatus,
    ) -> Result<(), StoreError>;

    /// All project tasks of a project, ordered by position.
    async fn list_project_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectTask>, StoreError>;

    /// Pending project tasks whose every dependency is Completed.
    /// Recomputed from current state on every call.
    async fn ready_project_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectTask>, StoreError>;

    /// Delete one project task.
    async fn delete_project_task(&self, id: ProjectTaskId) -> Result<(), StoreError>;
}
