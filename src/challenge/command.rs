//! External command execution
//!
//! The token command is run through this seam so challenge providers can be
//! exercised without spawning processes.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Error, Clone)]
pub enum CommandError {
    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("Command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<CommandOutput, CommandError>;
}

/// Runs commands with `tokio::process`, killing them after `timeout`.
pub struct ProcessCommandExecutor {
    timeout: Duration,
}

impl ProcessCommandExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<CommandOutput, CommandError> {
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| CommandError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::CommandNotFound {
                        command: program.to_string(),
                    }
                } else {
                    CommandError::ExecutionFailed { message: e.to_string() }
                }
            })?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_command_executor_success() {
        let executor = ProcessCommandExecutor::new(Duration::from_secs(5));
        let output = executor
            .execute("echo", &["hello".to_string()], &[])
            .await
            .unwrap();

        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_process_command_executor_passes_environment() {
        let executor = ProcessCommandExecutor::new(Duration::from_secs(5));
        let output = executor
            .execute(
                "sh",
                &["-c".to_string(), "printf %s \"$FREEFORM_RELAY_SITE_KEY\"".to_string()],
                &[("FREEFORM_RELAY_SITE_KEY".to_string(), "site-key".to_string())],
            )
            .await
            .unwrap();

        assert_eq!(output.stdout, "site-key");
    }

    #[tokio::test]
    async fn test_process_command_executor_command_not_found() {
        let executor = ProcessCommandExecutor::new(Duration::from_secs(5));
        let result = executor.execute("nonexistent_command_xyz", &[], &[]).await;

        assert!(matches!(result.unwrap_err(), CommandError::CommandNotFound { .. }));
    }
}
