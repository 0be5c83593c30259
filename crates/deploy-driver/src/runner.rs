//! External command execution
//!
//! Commands are always an argument vector handed straight to the OS; no
//! shell ever sees them. A bounded command that outlives its timeout is
//! killed, and so is any command whose future is dropped.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// `None` runs until the process exits or the caller drops the future
    pub timeout: Option<Duration>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// One-line failure description for a non-zero exit.
    pub fn failure_reason(&self) -> String {
        let code = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            code
        } else {
            format!("{}: {}", code, stderr)
        }
    }
}

/// Why a command produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("could not start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{command}' timed out after {}s", timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
}

/// Runs external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, RunError>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl CommandRunner for TokioRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, RunError> {
        tracing::debug!(command = %command, cwd = ?command.cwd, timeout = ?command.timeout, "Executing");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }

        let started = Instant::now();
        let result = match command.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| RunError::TimedOut {
                    command: command.to_string(),
                    timeout: limit,
                })?,
            None => cmd.output().await,
        };
        let output = result.map_err(|e| RunError::Spawn {
            program: command.program.clone(),
            message: e.to_string(),
        })?;

        let output = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: started.elapsed(),
        };
        tracing::debug!(
            command = %command,
            exit_code = ?output.exit_code,
            elapsed_ms = output.elapsed.as_millis() as u64,
            "Command finished"
        );
        Ok(output)
    }
}
