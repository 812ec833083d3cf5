//! The orchestrator: task submission, execution, and queue processing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use foreman_core::{NewTask, ProjectId, TaskId, TaskStatus, DEFAULT_TIMEOUT_SECS};
use foreman_runner::{Invoker, RunRequest};
use foreman_store::{TaskPatch, TaskStore};

use crate::error::EngineError;
use crate::notify::StatusListener;

/// Notification previews are truncated to this many characters.
pub(crate) const PREVIEW_LIMIT: usize = 500;

/// The "Starting:" notification shows this much of the prompt.
const START_PREVIEW_LIMIT: usize = 100;

/// Action verbs that mark a prompt as multi-step work. A prompt containing
/// none of them is classified one-shot and runs as a single terminal call.
const MULTI_STEP_KEYWORDS: [&str; 15] = [
    "fix", "implement", "build", "deploy", "commit", "create", "write", "refactor", "update",
    "modify", "change", "add", "remove", "delete", "install",
];

/// Case-insensitive substring classification of a prompt.
pub(crate) fn is_multi_step(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    MULTI_STEP_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Truncate to a character count without splitting a code point.
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Coordinates task execution and project advancement.
///
/// All outcomes are observed through store state and notifications; the
/// dispatch paths are fire-and-forget.
pub struct Orchestrator {
    pub(crate) store: Arc<dyn TaskStore>,
    pub(crate) runner: Arc<dyn Invoker>,
    listeners: RwLock<Vec<Arc<dyn StatusListener>>>,
    processing: AtomicBool,
    /// One advancement lock per project, created lazily and never removed.
    pub(crate) project_locks: Mutex<HashMap<ProjectId, Arc<Mutex<()>>>>,
}

impl Orchestrator {
    /// Create a new Orchestrator wrapped in Arc.
    pub fn new(store: Arc<dyn TaskStore>, runner: Arc<dyn Invoker>) -> Arc<Self> {
        Arc::new(Self {
            store,
            runner,
            listeners: RwLock::new(Vec::new()),
            processing: AtomicBool::new(false),
            project_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Register a status listener (for chat transports, web frontends, ...).
    pub async fn subscribe(&self, listener: Arc<dyn StatusListener>) {
        self.listeners.write().await.push(listener);
    }

    /// Fan a status transition out to every listener, isolating failures.
    pub(crate) async fn notify_all(&self, task_id: TaskId, status: TaskStatus, message: &str) {
        let listeners = self.listeners.read().await.clone();
        for listener in listeners {
            if let Err(e) = listener.on_status(task_id, status, message).await {
                error!(task_id = %task_id, error = %e, "Notification listener error");
            }
        }
    }

    /// Create a new Pending task and return its id.
    pub async fn submit(&self, new: NewTask) -> Result<TaskId, EngineError> {
        let agent_type = new.agent_type.clone();
        let source = new.source.clone();
        let task_id = self.store.create_task(new).await?;
        info!(task_id = %task_id, agent = %agent_type, source = %source, "Task submitted");
        Ok(task_id)
    }

    /// Execute a single task: resolve config, run, record outcome, notify.
    ///
    /// A missing task is a logged no-op. Run-level failures become a Failed
    /// status, never an error; only store failures propagate.
    pub async fn execute_task(&self, task_id: TaskId) -> Result<(), EngineError> {
        let Some(task) = self.store.get_task(task_id).await? else {
            warn!(task_id = %task_id, "Task not found");
            return Ok(());
        };

        let agent = self.store.get_agent(&task.agent_type).await?;

        let system_prompt = agent.as_ref().map(|a| a.system_prompt.clone());
        let working_dir = task
            .working_dir
            .clone()
            .or_else(|| agent.as_ref().and_then(|a| a.working_dir.clone()));
        let timeout_secs = agent
            .as_ref()
            .map(|a| a.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        // Stored as a JSON array string; anything malformed means no
        // restriction rather than a failed task.
        let allowed_tools = agent
            .as_ref()
            .and_then(|a| a.allowed_tools.as_deref())
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok());

        self.store
            .update_task(task_id, TaskPatch::status(TaskStatus::Running))
            .await?;
        let preview = truncate(&task.prompt, START_PREVIEW_LIMIT);
        self.notify_all(
            task_id,
            TaskStatus::Running,
            &format!("Starting: {preview}"),
        )
        .await;

        self.store
            .add_conversation(task_id, foreman_core::Role::User, &task.prompt)
            .await?;

        let mut request = RunRequest::new(task.prompt.clone())
            .oneshot(!is_multi_step(&task.prompt))
            .with_timeout_secs(timeout_secs);
        if let Some(sp) = system_prompt {
            request = request.with_system_prompt(sp);
        }
        if let Some(sid) = task.session_id.clone() {
            request = request.with_session_id(sid);
        }
        if let Some(dir) = working_dir {
            request = request.with_working_dir(dir);
        }
        if let Some(tools) = allowed_tools {
            request = request.with_allowed_tools(tools);
        }

        let outcome = self.runner.run(request).await;

        // The raw output is logged even on failure.
        self.store
            .add_conversation(task_id, foreman_core::Role::Assistant, &outcome.stdout)
            .await?;

        if outcome.success() {
            let mut patch = TaskPatch::status(TaskStatus::Completed).with_result(&outcome.stdout);
            patch.session_id = outcome.session_id;
            self.store.update_task(task_id, patch).await?;
            self.notify_all(
                task_id,
                TaskStatus::Completed,
                &truncate(&outcome.stdout, PREVIEW_LIMIT),
            )
            .await;
            info!(task_id = %task_id, "Task completed");
        } else {
            let mut patch = TaskPatch::status(TaskStatus::Failed).with_error(&outcome.stderr);
            patch.session_id = outcome.session_id;
            self.store.update_task(task_id, patch).await?;
            self.notify_all(
                task_id,
                TaskStatus::Failed,
                &format!("Error: {}", truncate(&outcome.stderr, PREVIEW_LIMIT)),
            )
            .await;
            warn!(
                task_id = %task_id,
                error = %truncate(&outcome.stderr, 200),
                "Task failed"
            );
        }

        Ok(())
    }

    /// Drain currently pending tasks once, dispatching each fire-and-forget.
    ///
    /// The runner's concurrency limiter is the only throttle; the processor
    /// itself applies none.
    pub async fn process_queue(self: &Arc<Self>) -> Result<(), EngineError> {
        let pending = self.store.pending_tasks().await?;
        for task in pending {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = this.execute_task(task.id).await {
                    error!(task_id = %task.id, error = %e, "Task execution error");
                }
            });
        }
        Ok(())
    }

    /// Run `process_queue` in a loop until [`Orchestrator::stop_processing`]
    /// is observed at the top of an iteration. Listing errors are logged and
    /// the loop continues on the next interval.
    pub async fn start_processing(self: Arc<Self>, interval: Duration) {
        self.processing.store(true, Ordering::SeqCst);
        info!("Task processor started");
        while self.processing.load(Ordering::SeqCst) {
            if let Err(e) = self.process_queue().await {
                error!(error = %e, "Queue processing error");
            }
            tokio::time::sleep(interval).await;
        }
        debug!("Task processor stopped");
    }

    /// Ask the processing loop to stop. Cooperative: an in-flight iteration
    /// finishes first, and in-flight executions are not cancelled.
    pub fn stop_processing(&self) {
        self.processing.store(false, Ordering::SeqCst);
    }
}
