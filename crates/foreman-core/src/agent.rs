//! Agent configuration and conversation log types.

use crate::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default per-run timeout when an agent config does not specify one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Named bundle of defaults applied to tasks of a given agent type.
///
/// Looked up by a task's `agent_type`; absence is tolerated and the task
/// runs with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique agent name (the task's `agent_type` key).
    pub name: String,

    /// System prompt injected into every run for this agent.
    pub system_prompt: String,

    /// Default working directory for this agent's runs.
    pub working_dir: Option<String>,

    /// Per-run timeout in seconds.
    pub timeout_secs: u64,

    /// Optional tool allow-list, stored as a JSON array string
    /// (e.g. `["Read","Bash"]`). Malformed text means no restriction.
    pub allowed_tools: Option<String>,
}

impl AgentConfig {
    /// Create a new AgentConfig with default timeout and no restrictions.
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            working_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            allowed_tools: None,
        }
    }

    /// Builder method to set the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Builder method to set the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Builder method to set the tool allow-list (JSON array text).
    pub fn with_allowed_tools(mut self, tools_json: impl Into<String>) -> Self {
        self.allowed_tools = Some(tools_json.into());
        self
    }
}

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The submitted prompt.
    User,
    /// The agent process output.
    Assistant,
}

/// One entry in a task's conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Task this entry belongs to.
    pub task_id: TaskId,
    /// Who authored the content.
    pub role: Role,
    /// The logged text.
    pub content: String,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}
