//! [`ScriptedRunner`]: a recording, scriptable `CommandRunner`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use deploy_driver::{CommandOutput, CommandRunner, ExternalCommand, RunError};

/// A scripted answer.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Finish with this output
    Output(CommandOutput),
    /// Fail to start, as if the binary were missing
    SpawnFailure(String),
    /// Never finish on its own. Honors the command's timeout if it has one.
    Hang,
}

impl Scripted {
    /// Exit 0 with `stdout`.
    pub fn ok(stdout: &str) -> Self {
        Self::Output(CommandOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            ..Default::default()
        })
    }

    /// Exit 0 with both streams.
    pub fn ok_with_stderr(stdout: &str, stderr: &str) -> Self {
        Self::Output(CommandOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            ..Default::default()
        })
    }

    /// Exit with `code` and `stderr`.
    pub fn fail(code: i32, stderr: &str) -> Self {
        Self::Output(CommandOutput {
            exit_code: Some(code),
            stderr: stderr.to_string(),
            ..Default::default()
        })
    }
}

/// Records every command and answers from prefix-matched rules.
///
/// Rules match against the rendered argv (`"skaffold dev"`,
/// `"kubectl logs -l app=x --tail=100"`); the most recently added match
/// wins. Unmatched commands exit 0 with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<(String, Scripted)>>,
    calls: Mutex<Vec<ExternalCommand>>,
    dropped: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix`.
    pub fn on(&self, prefix: &str, response: Scripted) -> &Self {
        self.rules
            .lock()
            .unwrap()
            .push((prefix.to_string(), response));
        self
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<ExternalCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered argv of every command run so far.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// How many hanging commands were abandoned by their caller.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }

    fn response_for(&self, line: &str) -> Option<Scripted> {
        self.rules
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
    }
}

/// Counts a drop unless disarmed.
struct DropCounter<'a> {
    counter: &'a AtomicUsize,
    armed: bool,
}

impl Drop for DropCounter<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, RunError> {
        self.calls.lock().unwrap().push(command.clone());
        let line = command.to_string();

        match self.response_for(&line) {
            None => Ok(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            }),
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnFailure(message)) => Err(RunError::Spawn {
                program: command.program.clone(),
                message,
            }),
            Some(Scripted::Hang) => {
                let mut guard = DropCounter {
                    counter: &self.dropped,
                    armed: true,
                };
                match command.timeout {
                    Some(limit) => {
                        tokio::time::sleep(limit).await;
                        guard.armed = false;
                        Err(RunError::TimedOut {
                            command: line,
                            timeout: limit,
                        })
                    }
                    None => {
                        std::future::pending::<()>().await;
                        guard.armed = false;
                        Err(RunError::TimedOut {
                            command: line,
                            timeout: Duration::MAX,
                        })
                    }
                }
            }
        }
    }
}
