//! Foreman CLI - submit and execute agent tasks from the command line.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use foreman_core::{NewTask, TaskId, TaskStatus};
use foreman_engine::{NotifyError, Orchestrator, StatusListener};
use foreman_runner::ClaudeRunner;
use foreman_store::{MemoryStore, TaskStore};

/// Foreman - agent task orchestration
#[derive(Parser)]
#[command(name = "foreman")]
#[command(about = "Run and orchestrate external agent tasks", long_about = None)]
struct Cli {
    /// Path to the Claude CLI executable
    #[arg(long, default_value = "claude")]
    claude_path: String,

    /// Maximum simultaneous agent invocations
    #[arg(long, default_value_t = 4)]
    max_concurrent: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one task and execute it to completion
    Run {
        /// Agent type for the task
        #[arg(short, long, default_value = "general")]
        agent: String,

        /// The prompt to run
        #[arg(short, long)]
        prompt: String,

        /// Dispatch priority; higher runs first
        #[arg(long, default_value_t = 0)]
        priority: i64,

        /// Working directory for the agent process
        #[arg(long)]
        working_dir: Option<String>,
    },

    /// Run the queue processor until interrupted
    Serve {
        /// Seconds between queue polls
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
    },

    /// One-shot query; prints the trimmed response
    Quick {
        /// The prompt to send
        #[arg(short, long)]
        prompt: String,

        /// Optional system prompt
        #[arg(long)]
        system_prompt: Option<String>,

        /// Timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },
}

/// Prints status transitions to stderr as they happen.
struct StderrListener;

#[async_trait]
impl StatusListener for StderrListener {
    async fn on_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        message: &str,
    ) -> Result<(), NotifyError> {
        eprintln!("[task {task_id}] {status}: {message}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let store: Arc<dyn TaskStore> = Arc::new(MemoryStore::new());
    let runner = Arc::new(ClaudeRunner::with_max_concurrent(
        cli.claude_path.clone(),
        cli.max_concurrent,
    ));
    let orchestrator = Orchestrator::new(store.clone(), runner.clone());

    match cli.command {
        Commands::Run {
            agent,
            prompt,
            priority,
            working_dir,
        } => {
            orchestrator.subscribe(Arc::new(StderrListener)).await;

            let mut new = NewTask::new(agent, prompt)
                .with_priority(priority)
                .with_source("manual");
            if let Some(dir) = working_dir {
                new = new.with_working_dir(dir);
            }

            let task_id = orchestrator.submit(new).await?;
            orchestrator.execute_task(task_id).await?;

            let task = store
                .get_task(task_id)
                .await?
                .ok_or("task missing after execution")?;
            match task.status {
                TaskStatus::Completed => {
                    println!("{}", task.result.unwrap_or_default());
                }
                _ => {
                    eprintln!("task failed: {}", task.error.unwrap_or_default());
                    std::process::exit(1);
                }
            }
        }

        Commands::Serve { interval_secs } => {
            orchestrator.subscribe(Arc::new(StderrListener)).await;

            info!(interval_secs, "Starting queue processor");
            let processor = tokio::spawn(
                Arc::clone(&orchestrator).start_processing(Duration::from_secs(interval_secs)),
            );

            tokio::signal::ctrl_c().await?;
            info!("Shutting down");
            orchestrator.stop_processing();
            processor.await?;
        }

        Commands::Quick {
            prompt,
            system_prompt,
            timeout_secs,
        } => {
            let text = runner
                .quick(prompt, system_prompt.as_deref(), timeout_secs)
                .await?;
            println!("{text}");
        }
    }

    Ok(())
}
