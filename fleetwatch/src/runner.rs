//! Shell command execution with a wall-clock deadline.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("command timed out")]
    Timeout,
    #[error("{0}")]
    Failure(String),
}

/// Something that can execute a shell-syntax command and hand back its stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<String, RunError>;
}

/// Runs commands through `sh -c`, discarding stderr.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    deadline: Duration,
}

impl ShellRunner {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<String, RunError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            // the child must not outlive a timed-out future
            .kill_on_drop(true);

        let output = timeout(self.deadline, cmd.output())
            .await
            .map_err(|_| RunError::Timeout)?
            .map_err(|e| RunError::Failure(e.to_string()))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        match output.status.code() {
            Some(code) => Err(RunError::Failure(format!("exit status {code}"))),
            None => Err(RunError::Failure("terminated by signal".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_drops_stderr() {
        let runner = ShellRunner::default();
        let out = runner.run("echo hello; echo oops >&2").await.unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn shell_expands_pipes_and_variables() {
        let runner = ShellRunner::default();
        let out = runner.run("X=abc; echo $X | tr a-z A-Z").await.unwrap();
        assert_eq!(out.trim(), "ABC");
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure() {
        let runner = ShellRunner::default();
        let err = runner.run("echo partial; exit 3").await.unwrap_err();
        assert_eq!(err, RunError::Failure("exit status 3".into()));
    }

    #[tokio::test]
    async fn deadline_yields_timeout() {
        let runner = ShellRunner::new(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = runner.run("echo early; sleep 5").await.unwrap_err();
        assert_eq!(err, RunError::Timeout);
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
