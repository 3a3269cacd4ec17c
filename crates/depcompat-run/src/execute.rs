//! Example execution.
//!
//! The orchestrator only sees the [`ExampleRunner`] trait; the production
//! implementation spawns the tool as a bounded-time subprocess with the
//! configured headless environment.

use async_trait::async_trait;
use depcompat_core::{ExampleConfig, Result, RunConfig, RunError};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Executes one example configuration.
#[async_trait]
pub trait ExampleRunner: Send + Sync {
    /// Run one example to completion. Success means the example's process
    /// exited cleanly within its time budget.
    async fn execute(&self, config: &ExampleConfig) -> Result<()>;
}

/// Production runner: spawns the tool (or a documented command) as a child
/// process, kills it when the time budget runs out.
pub struct ToolProcessRunner {
    config: RunConfig,
}

impl ToolProcessRunner {
    /// Create a runner for the given run configuration.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn build_command(&self, example: &ExampleConfig) -> Command {
        let mut command = match example {
            ExampleConfig::ConfigFile { path } => {
                let mut command = Command::new("node");
                command
                    .arg(self.config.tool_bin_path())
                    .arg("--config")
                    .arg(path)
                    .current_dir(&self.config.workdir);
                command
            }
            ExampleConfig::Command { command: line, cwd } => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(line).current_dir(cwd);
                command
            }
        };

        for (key, value) in &self.config.example_env {
            command.env(key, value);
        }
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The child must not outlive a timed-out execution.
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl ExampleRunner for ToolProcessRunner {
    async fn execute(&self, example: &ExampleConfig) -> Result<()> {
        let timeout_secs = self.config.example_timeout_secs;
        let mut command = self.build_command(example);

        debug!(timeout_secs, "executing example");

        let child = command.spawn().map_err(|e| RunError::ExampleExecFailed {
            output: format!("failed to spawn example process: {}", e),
        })?;

        let output = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| RunError::ExampleTimedOut { timeout_secs })?
        .map_err(|e| RunError::ExampleExecFailed {
            output: e.to_string(),
        })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RunError::ExampleExecFailed {
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
