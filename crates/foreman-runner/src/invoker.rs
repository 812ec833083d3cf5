//! Claude CLI invocation with bounded concurrency.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::error::RunnerError;

/// Default number of simultaneous agent invocations.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default per-run timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Output format requested from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raw text on stdout.
    #[default]
    Text,
    /// JSON payload carrying the result text and continuation token.
    Json,
}

/// Parameters for one external agent invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// The prompt text.
    pub prompt: String,

    /// One-shot terminal call vs. resumable session.
    pub oneshot: bool,

    /// System prompt to inject.
    pub system_prompt: Option<String>,

    /// Continuation token from a prior run to resume.
    pub session_id: Option<String>,

    /// Working directory for the spawned process.
    pub working_dir: Option<String>,

    /// Hard wall-clock timeout in seconds.
    pub timeout_secs: u64,

    /// Requested output format.
    pub output_format: OutputFormat,

    /// Tool allow-list; `None` means no restriction.
    pub allowed_tools: Option<Vec<String>>,
}

impl RunRequest {
    /// Create a request with defaults: session mode, text output, 300s timeout.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            oneshot: false,
            system_prompt: None,
            session_id: None,
            working_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_format: OutputFormat::Text,
            allowed_tools: None,
        }
    }

    /// Builder method to request a one-shot terminal call.
    pub fn oneshot(mut self, oneshot: bool) -> Self {
        self.oneshot = oneshot;
        self
    }

    /// Builder method to set the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Builder method to resume a prior session.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
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

    /// Builder method to set the output format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Builder method to set the tool allow-list.
    pub fn with_allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.allowed_tools = Some(tools);
        self
    }
}

/// Structured result of one external agent invocation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Process stdout (or the extracted result text in JSON mode).
    pub stdout: String,

    /// Process stderr, or a synthesized message for timeout/spawn failures.
    pub stderr: String,

    /// Process exit code; `-1` for timeout, spawn, or decode failures.
    pub exit_code: i32,

    /// Continuation token for resuming this session later.
    pub session_id: Option<String>,
}

impl RunOutcome {
    /// Success is exit code zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn failure(stderr: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: -1,
            session_id,
        }
    }
}

/// JSON payload shape produced by `--output-format json`.
#[derive(Debug, Deserialize)]
struct JsonPayload {
    session_id: Option<String>,
    result: Option<String>,
}

/// The seam the engine executes runs through. `run` never fails: every
/// invocation-level problem is folded into a failure [`RunOutcome`].
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Execute one agent invocation.
    async fn run(&self, request: RunRequest) -> RunOutcome;
}

/// Executes agents by spawning the Claude CLI, admission-controlled by a
/// fixed-size semaphore.
pub struct ClaudeRunner {
    /// Path to the Claude CLI executable.
    claude_path: String,

    /// Concurrency limiter; callers block here until a slot frees.
    semaphore: Semaphore,
}

impl ClaudeRunner {
    /// Create a runner with the default concurrency cap.
    ///
    /// The path can be just "claude" to use PATH lookup, or a full path.
    pub fn new(claude_path: impl Into<String>) -> Self {
        Self::with_max_concurrent(claude_path, DEFAULT_MAX_CONCURRENT)
    }

    /// Create a runner with an explicit concurrency cap.
    pub fn with_max_concurrent(claude_path: impl Into<String>, max_concurrent: usize) -> Self {
        Self {
            claude_path: claude_path.into(),
            semaphore: Semaphore::new(max_concurrent),
        }
    }

    /// Build the CLI argument list for a request.
    fn build_args(&self, request: &RunRequest) -> Vec<String> {
        let mut args = Vec::new();

        if request.oneshot {
            args.push("--print".to_string());
        }

        if let Some(session_id) = &request.session_id {
            args.push("--resume".to_string());
            args.push(session_id.clone());
        }

        if let Some(system_prompt) = &request.system_prompt {
            args.push("--system-prompt".to_string());
            args.push(system_prompt.clone());
        }

        if request.output_format == OutputFormat::Json {
            args.push("--output-format".to_string());
            args.push("json".to_string());
        }

        if let Some(tools) = &request.allowed_tools {
            for tool in tools {
                args.push("--allowedTools".to_string());
                args.push(tool.clone());
            }
        }

        args.push("-p".to_string());
        args.push(request.prompt.clone());

        args
    }

    /// One-shot convenience: returns the trimmed text on success, an error
    /// carrying the stderr text otherwise.
    pub async fn quick(
        &self,
        prompt: impl Into<String>,
        system_prompt: Option<&str>,
        timeout_secs: u64,
    ) -> Result<String, RunnerError> {
        let mut request = RunRequest::new(prompt)
            .oneshot(true)
            .with_timeout_secs(timeout_secs);
        if let Some(sp) = system_prompt {
            request = request.with_system_prompt(sp);
        }

        let outcome = self.run(request).await;
        if outcome.success() {
            Ok(outcome.stdout.trim().to_string())
        } else {
            Err(RunnerError::Failed(outcome.stderr))
        }
    }
}

#[async_trait]
impl Invoker for ClaudeRunner {
    async fn run(&self, request: RunRequest) -> RunOutcome {
        let args = self.build_args(&request);

        info!(
            claude_path = %self.claude_path,
            oneshot = request.oneshot,
            prompt_len = request.prompt.len(),
            timeout_secs = request.timeout_secs,
            "Preparing agent invocation"
        );

        // Admission control: block here until a slot frees.
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return RunOutcome::failure("concurrency limiter closed", request.session_id)
            }
        };

        let mut cmd = Command::new(&self.claude_path);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout must kill the child.
            .kill_on_drop(true);

        if let Some(dir) = &request.working_dir {
            cmd.current_dir(dir);
        }

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "Failed to spawn agent process");
                return RunOutcome::failure(e.to_string(), request.session_id);
            }
        };

        let output = match timeout(
            Duration::from_secs(request.timeout_secs),
            child.wait_with_output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(error = %e, "Agent process wait failed");
                return RunOutcome::failure(e.to_string(), request.session_id);
            }
            Err(_) => {
                warn!(
                    timeout_secs = request.timeout_secs,
                    "Agent invocation timed out"
                );
                return RunOutcome::failure(
                    format!("task timed out after {} seconds", request.timeout_secs),
                    request.session_id,
                );
            }
        };

        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);

        // In JSON mode, pull the result text and continuation token out of
        // the payload; on parse failure the raw text passes through untouched.
        let mut session_id = request.session_id.clone();
        if request.output_format == OutputFormat::Json {
            if let Some(payload) = parse_json_payload(&stdout) {
                if let Some(result) = payload.result {
                    stdout = result;
                }
                if payload.session_id.is_some() {
                    session_id = payload.session_id;
                }
            }
        }

        info!(
            exit_code,
            output_len = stdout.len(),
            "Agent invocation finished"
        );

        RunOutcome {
            stdout,
            stderr,
            exit_code,
            session_id,
        }
    }
}

/// Try to interpret stdout as the CLI's JSON result payload.
fn parse_json_payload(stdout: &str) -> Option<JsonPayload> {
    serde_json::from_str(stdout).ok()
}
