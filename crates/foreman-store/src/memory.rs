//! In-memory store implementation.
//!
//! Maps guarded by `tokio::sync::RwLock`, ids allocated from atomic
//! counters. Conflicting writes serialize on the write locks, so the
//! orchestration engine needs no extra locking around record updates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use foreman_core::{
    AgentConfig, ConversationEntry, NewProjectTask, NewTask, Project, ProjectId, ProjectStatus,
    ProjectTask, ProjectTaskId, ProjectTaskStatus, Role, Task, TaskId, TaskStatus,
};

use crate::error::StoreError;
use crate::{ProjectPatch, ProjectTaskPatch, TaskFilter, TaskPatch, TaskStore};

/// In-memory [`TaskStore`] backed by `RwLock`-guarded maps.
#[derive(Default)]
pub struct MemoryStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
    agents: RwLock<HashMap<String, AgentConfig>>,
    conversations: RwLock<Vec<ConversationEntry>>,
    projects: RwLock<HashMap<ProjectId, Project>>,
    project_tasks: RwLock<HashMap<ProjectTaskId, ProjectTask>>,
    next_task_id: AtomicI64,
    next_project_id: AtomicI64,
    next_project_task_id: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, new: NewTask) -> Result<TaskId, StoreError> {
        let id = TaskId::new(Self::alloc(&self.next_task_id));
        let task = Task {
            id,
            agent_type: new.agent_type,
            prompt: new.prompt,
            priority: new.priority,
            status: TaskStatus::Pending,
            result: None,
            error: None,
            session_id: None,
            working_dir: new.working_dir,
            source: new.source,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };
        self.tasks.write().await.insert(id, task);
        Ok(id)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(StoreError::TaskNotFound(id))?;

        if let Some(status) = patch.status {
            task.status = status;
            // Lifecycle timestamps are stamped once, on first transition.
            if status == TaskStatus::Running && task.started_at.is_none() {
                task.started_at = Some(Utc::now());
            }
            if status.is_terminal() && task.completed_at.is_none() {
                task.completed_at = Some(Utc::now());
            }
        }
        if let Some(result) = patch.result {
            task.result = Some(result);
        }
        if let Some(error) = patch.error {
            task.error = Some(error);
        }
        if let Some(session_id) = patch.session_id {
            task.session_id = Some(session_id);
        }
        Ok(())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut out: Vec<Task> = tasks
            .values()
            .filter(|t| {
                filter
                    .agent_type
                    .as_ref()
                    .map_or(true, |a| &t.agent_type == a)
                    && filter.status.map_or(true, |s| t.status == s)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    async fn pending_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut out: Vec<Task> = tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .cloned()
            .collect();
        // Priority descending, then FIFO within the same priority. Ids break
        // ties between tasks created in the same instant.
        out.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(out)
    }

    async fn get_agent(&self, name: &str) -> Result<Option<AgentConfig>, StoreError> {
        Ok(self.agents.read().await.get(name).cloned())
    }

    async fn put_agent(&self, config: AgentConfig) -> Result<(), StoreError> {
        self.agents
            .write()
            .await
            .insert(config.name.clone(), config);
        Ok(())
    }

    async fn list_agents(&self) -> Result<Vec<AgentConfig>, StoreError> {
        let agents = self.agents.read().await;
        let mut out: Vec<AgentConfig> = agents.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn add_conversation(
        &self,
        task_id: TaskId,
        role: Role,
        content: &str,
    ) -> Result<(), StoreError> {
        self.conversations.write().await.push(ConversationEntry {
            task_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn conversation(&self, task_id: TaskId) -> Result<Vec<ConversationEntry>, StoreError> {
        Ok(self
            .conversations
            .read()
            .await
            .iter()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn create_project(&self, name: &str, brief: &str) -> Result<ProjectId, StoreError> {
        let id = ProjectId::new(Self::alloc(&self.next_project_id));
        let project = Project {
            id,
            name: name.to_string(),
            brief: brief.to_string(),
            status: ProjectStatus::Draft,
            created_at: Utc::now(),
        };
        self.projects.write().await.insert(id, project);
        Ok(id)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), StoreError> {
        let mut projects = self.projects.write().await;
        let project = projects.get_mut(&id).ok_or(StoreError::ProjectNotFound(id))?;
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(brief) = patch.brief {
            project.brief = brief;
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        Ok(())
    }

    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, StoreError> {
        let projects = self.projects.read().await;
        let mut out: Vec<Project> = projects
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), StoreError> {
        self.projects.write().await.remove(&id);
        self.project_tasks
            .write()
            .await
            .retain(|_, pt| pt.project_id != id);
        Ok(())
    }

    async fn create_project_task(
        &self,
        new: NewProjectTask,
    ) -> Result<ProjectTaskId, StoreError> {
        if !self.projects.read().await.contains_key(&new.project_id) {
            return Err(StoreError::ProjectNotFound(new.project_id));
        }

        let mut project_tasks = self.project_tasks.write().await;
        for dep in &new.depends_on {
            let valid = project_tasks
                .get(dep)
                .is_some_and(|pt| pt.project_id == new.project_id);
            if !valid {
                return Err(StoreError::UnknownDependency {
                    project: new.project_id,
                    dependency: *dep,
                });
            }
        }

        let id = ProjectTaskId::new(Self::alloc(&self.next_project_task_id));
        let pt = ProjectTask {
            id,
            project_id: new.project_id,
            title: new.title,
            agent_type: new.agent_type,
            prompt: new.prompt,
            position: new.position,
            depends_on: new.depends_on,
            status: ProjectTaskStatus::Pending,
            task_id: None,
            created_at: Utc::now(),
        };
        project_tasks.insert(id, pt);
        Ok(id)
    }

    async fn get_project_task(
        &self,
        id: ProjectTaskId,
    ) -> Result<Option<ProjectTask>, StoreError> {
        Ok(self.project_tasks.read().await.get(&id).cloned())
    }

    async fn update_project_task(
        &self,
        id: ProjectTaskId,
        patch: ProjectTaskPatch,
    ) -> Result<(), StoreError> {
        let mut project_tasks = self.project_tasks.write().await;
        let project_id = project_tasks
            .get(&id)
            .ok_or(StoreError::ProjectTaskNotFound(id))?
            .project_id;

        // Validate before taking the mutable borrow.
        if let Some(deps) = &patch.depends_on {
            for dep in deps {
                let valid = *dep != id
                    && project_tasks
                        .get(dep)
                        .is_some_and(|other| other.project_id == project_id);
                if !valid {
                    return Err(StoreError::UnknownDependency {
                        project: project_id,
                        dependency: *dep,
                    });
                }
            }
        }

        let pt = project_tasks
            .get_mut(&id)
            .ok_or(StoreError::ProjectTaskNotFound(id))?;
        if let Some(title) = patch.title {
            pt.title = title;
        }
        if let Some(prompt) = patch.prompt {
            pt.prompt = prompt;
        }
        if let Some(position) = patch.position {
            pt.position = position;
        }
        if let Some(depends_on) = patch.depends_on {
            pt.depends_on = depends_on;
        }
        if let Some(status) = patch.status {
            pt.status = status;
        }
        Ok(())
    }

    async fn claim_project_task(&self, id: ProjectTaskId) -> Result<bool, StoreError> {
        let mut project_tasks = self.project_tasks.write().await;
        let pt = project_tasks
            .get_mut(&id)
            .ok_or(StoreError::ProjectTaskNotFound(id))?;
        if pt.status != ProjectTaskStatus::Pending {
            return Ok(false);
        }
        pt.status = ProjectTaskStatus::Running;
        Ok(true)
    }

    async fn link_project_task(
        &self,
        id: ProjectTaskId,
        task_id: TaskId,
        status: ProjectTaskStatus,
    ) -> Result<(), StoreError> {
        let mut project_tasks = self.project_tasks.write().await;
        let pt = project_tasks
            .get_mut(&id)
            .ok_or(StoreError::ProjectTaskNotFound(id))?;
        pt.task_id = Some(task_id);
        pt.status = status;
        Ok(())
    }

    async fn list_project_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectTask>, StoreError> {
        let project_tasks = self.project_tasks.read().await;
        let mut out: Vec<ProjectTask> = project_tasks
            .values()
            .filter(|pt| pt.project_id == project_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.position.cmp(&b.position).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn ready_project_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectTask>, StoreError> {
        let project_tasks = self.project_tasks.read().await;
        let mut out: Vec<ProjectTask> = project_tasks
            .values()
            .filter(|pt| pt.project_id == project_id && pt.status == ProjectTaskStatus::Pending)
            .filter(|pt| {
                pt.depends_on.iter().all(|dep| {
                    project_tasks
                        .get(dep)
                        .is_some_and(|d| d.status == ProjectTaskStatus::Completed)
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.position.cmp(&b.position).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn delete_project_task(&self, id: ProjectTaskId) -> Result<(), StoreError> {
        self.project_tasks.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_task() {
        let store = MemoryStore::new();
        let id = store
            .create_task(NewTask::new("code", "fix it").with_priority(3))
            .await
            .unwrap();

        let task = store.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, 3);
        assert!(task.started_at.is_none());
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_timestamps_stamped_once() {
        let store = MemoryStore::new();
        let id = store.create_task(NewTask::new("a", "p")).await.unwrap();

        store
            .update_task(id, TaskPatch::status(TaskStatus::Running))
            .await
            .unwrap();
        let started = store.get_task(id).await.unwrap().unwrap().started_at;
        assert!(started.is_some());

        store
            .update_task(id, TaskPatch::status(TaskStatus::Completed))
            .await
            .unwrap();
        let task = store.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.started_at, started);
        assert!(task.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_pending_tasks_priority_then_age() {
        let store = MemoryStore::new();
        let low = store
            .create_task(NewTask::new("a", "low").with_priority(0))
            .await
            .unwrap();
        let high = store
            .create_task(NewTask::new("a", "high").with_priority(10))
            .await
            .unwrap();
        let low_later = store
            .create_task(NewTask::new("a", "low later").with_priority(0))
            .await
            .unwrap();

        let pending = store.pending_tasks().await.unwrap();
        let ids: Vec<TaskId> = pending.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![high, low, low_later]);
    }

    #[tokio::test]
    async fn test_list_tasks_filtered() {
        let store = MemoryStore::new();
        let a = store.create_task(NewTask::new("code", "one")).await.unwrap();
        store
            .create_task(NewTask::new("research", "two"))
            .await
            .unwrap();
        store
            .update_task(a, TaskPatch::status(TaskStatus::Running))
            .await
            .unwrap();

        let filter = TaskFilter {
            agent_type: Some("code".to_string()),
            ..Default::default()
        };
        let by_agent = store.list_tasks(filter).await.unwrap();
        assert_eq!(by_agent.len(), 1);
        assert_eq!(by_agent[0].id, a);

        let filter = TaskFilter {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        };
        let by_status = store.list_tasks(filter).await.unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].prompt, "two");

        let filter = TaskFilter {
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(store.list_tasks(filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pending_excludes_running() {
        let store = MemoryStore::new();
        let id = store.create_task(NewTask::new("a", "p")).await.unwrap();
        store
            .update_task(id, TaskPatch::status(TaskStatus::Running))
            .await
            .unwrap();
        assert!(store.pending_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let store = MemoryStore::new();
        let err = store
            .update_task(TaskId::new(999), TaskPatch::status(TaskStatus::Running))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn test_agents_roundtrip() {
        let store = MemoryStore::new();
        store
            .put_agent(AgentConfig::new("code", "You write code").with_timeout_secs(60))
            .await
            .unwrap();

        let agent = store.get_agent("code").await.unwrap().unwrap();
        assert_eq!(agent.timeout_secs, 60);
        assert!(store.get_agent("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conversation_log() {
        let store = MemoryStore::new();
        let id = store.create_task(NewTask::new("a", "p")).await.unwrap();
        store
            .add_conversation(id, Role::User, "hello")
            .await
            .unwrap();
        store
            .add_conversation(id, Role::Assistant, "hi")
            .await
            .unwrap();

        let log = store.conversation(id).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Role::User);
        assert_eq!(log[1].content, "hi");
    }

    #[tokio::test]
    async fn test_create_project_defaults_to_draft() {
        let store = MemoryStore::new();
        let pid = store.create_project("Deploy v2", "Ship it").await.unwrap();
        let project = store.get_project(pid).await.unwrap().unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.name, "Deploy v2");
    }

    #[tokio::test]
    async fn test_list_projects_filtered() {
        let store = MemoryStore::new();
        store.create_project("Draft 1", "b1").await.unwrap();
        let pid = store.create_project("Active 1", "b2").await.unwrap();
        store
            .update_project(pid, ProjectPatch::status(ProjectStatus::Active))
            .await
            .unwrap();

        assert_eq!(store.list_projects(None).await.unwrap().len(), 2);
        let active = store
            .list_projects(Some(ProjectStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Active 1");
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let store = MemoryStore::new();
        let pid = store.create_project("Temp", "gone soon").await.unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "A", "general", "do A"))
            .await
            .unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "B", "general", "do B"))
            .await
            .unwrap();

        store.delete_project(pid).await.unwrap();
        assert!(store.get_project(pid).await.unwrap().is_none());
        assert!(store.list_project_tasks(pid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_project_tasks_ordered_by_position() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "Second", "g", "p2").with_position(2))
            .await
            .unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "First", "g", "p1").with_position(1))
            .await
            .unwrap();

        let tasks = store.list_project_tasks(pid).await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_create_project_task_rejects_unknown_dependency() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let err = store
            .create_project_task(
                NewProjectTask::new(pid, "T", "g", "p")
                    .with_depends_on(vec![ProjectTaskId::new(999)]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownDependency { .. }));
    }

    #[tokio::test]
    async fn test_dependency_must_be_same_project() {
        let store = MemoryStore::new();
        let p1 = store.create_project("P1", "b").await.unwrap();
        let p2 = store.create_project("P2", "b").await.unwrap();
        let other = store
            .create_project_task(NewProjectTask::new(p1, "A", "g", "a"))
            .await
            .unwrap();

        let err = store
            .create_project_task(
                NewProjectTask::new(p2, "B", "g", "b").with_depends_on(vec![other]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownDependency { .. }));
    }

    #[tokio::test]
    async fn test_ready_with_no_deps() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "Root A", "g", "a"))
            .await
            .unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "Root B", "g", "b"))
            .await
            .unwrap();

        assert_eq!(store.ready_project_tasks(pid).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ready_blocked_until_dep_completes() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let first = store
            .create_project_task(NewProjectTask::new(pid, "First", "g", "p1"))
            .await
            .unwrap();
        store
            .create_project_task(
                NewProjectTask::new(pid, "Second", "g", "p2").with_depends_on(vec![first]),
            )
            .await
            .unwrap();

        let ready = store.ready_project_tasks(pid).await.unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].title, "First");

        store
            .update_project_task(first, ProjectTaskPatch::status(ProjectTaskStatus::Completed))
            .await
            .unwrap();
        let ready = store.ready_project_tasks(pid).await.unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].title, "Second");
    }

    #[tokio::test]
    async fn test_ready_requires_all_deps() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let a = store
            .create_project_task(NewProjectTask::new(pid, "A", "g", "a"))
            .await
            .unwrap();
        let b = store
            .create_project_task(NewProjectTask::new(pid, "B", "g", "b"))
            .await
            .unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "C", "g", "c").with_depends_on(vec![a, b]))
            .await
            .unwrap();

        store
            .update_project_task(a, ProjectTaskPatch::status(ProjectTaskStatus::Completed))
            .await
            .unwrap();
        let titles: Vec<String> = store
            .ready_project_tasks(pid)
            .await
            .unwrap()
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert!(!titles.contains(&"C".to_string()));

        store
            .update_project_task(b, ProjectTaskPatch::status(ProjectTaskStatus::Completed))
            .await
            .unwrap();
        let titles: Vec<String> = store
            .ready_project_tasks(pid)
            .await
            .unwrap()
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert!(titles.contains(&"C".to_string()));
    }

    #[tokio::test]
    async fn test_failed_dep_never_unblocks() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let a = store
            .create_project_task(NewProjectTask::new(pid, "A", "g", "a"))
            .await
            .unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "B", "g", "b").with_depends_on(vec![a]))
            .await
            .unwrap();

        store
            .update_project_task(a, ProjectTaskPatch::status(ProjectTaskStatus::Failed))
            .await
            .unwrap();
        assert!(store.ready_project_tasks(pid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skipped_dep_never_unblocks() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let a = store
            .create_project_task(NewProjectTask::new(pid, "A", "g", "a"))
            .await
            .unwrap();
        store
            .create_project_task(NewProjectTask::new(pid, "B", "g", "b").with_depends_on(vec![a]))
            .await
            .unwrap();

        store
            .update_project_task(a, ProjectTaskPatch::status(ProjectTaskStatus::Skipped))
            .await
            .unwrap();
        assert!(store.ready_project_tasks(pid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_claim_project_task_exclusive() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let pt = store
            .create_project_task(NewProjectTask::new(pid, "T", "g", "p"))
            .await
            .unwrap();

        assert!(store.claim_project_task(pt).await.unwrap());
        assert!(!store.claim_project_task(pt).await.unwrap());

        let claimed = store.get_project_task(pt).await.unwrap().unwrap();
        assert_eq!(claimed.status, ProjectTaskStatus::Running);
        assert!(store.ready_project_tasks(pid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_claim_missing_project_task() {
        let store = MemoryStore::new();
        let err = store
            .claim_project_task(ProjectTaskId::new(999))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ProjectTaskNotFound(_)));
    }

    #[tokio::test]
    async fn test_link_project_task() {
        let store = MemoryStore::new();
        let pid = store.create_project("P", "b").await.unwrap();
        let pt = store
            .create_project_task(NewProjectTask::new(pid, "T", "g", "p"))
            .await
            .unwrap();
        let task_id = store.create_task(NewTask::new("g", "p")).await.unwrap();

        store
            .link_project_task(pt, task_id, ProjectTaskStatus::Running)
            .await
            .unwrap();
        let linked = store.get_project_task(pt).await.unwrap().unwrap();
        assert_eq!(linked.task_id, Some(task_id));
        assert_eq!(linked.status, ProjectTaskStatus::Running);
    }
}
