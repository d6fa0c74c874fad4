//! Invocation descriptions and results.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Command;

use crate::bridge::error::{BridgeError, BridgeResult};

/// The external program a worker runs as.
///
/// With an interpreter the process is `interpreter entry args...`,
/// otherwise `entry` is executed directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub interpreter: Option<String>,
    pub entry: PathBuf,
}

impl WorkerCommand {
    /// Run `entry` through `interpreter`.
    pub fn interpreted(interpreter: impl Into<String>, entry: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: Some(interpreter.into()),
            entry: entry.into(),
        }
    }

    /// Execute `entry` directly.
    pub fn direct(entry: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: None,
            entry: entry.into(),
        }
    }

    /// Build the base command; the caller appends invocation arguments.
    pub(crate) fn to_command(&self) -> Command {
        match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&self.entry);
                command
            }
            None => Command::new(&self.entry),
        }
    }
}

impl std::fmt::Display for WorkerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.interpreter {
            Some(interpreter) => write!(f, "{} {}", interpreter, self.entry.display()),
            None => write!(f, "{}", self.entry.display()),
        }
    }
}

/// One request-scoped execution of a worker program.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    pub program: WorkerCommand,
    pub args: Vec<String>,
    /// Delivered over stdin followed by a newline; stdin is then closed.
    pub payload: Option<String>,
}

impl InvocationSpec {
    pub fn new(program: WorkerCommand) -> Self {
        Self {
            program,
            args: Vec::new(),
            payload: None,
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

    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// How a worker process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Normal exit with a status code.
    Exited(i32),
    /// Terminated by a signal; no exit code is available.
    Signaled,
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitState::Exited(code),
            None => ExitState::Signaled,
        }
    }
}

impl ExitState {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitState::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitState::Exited(code) => Some(*code),
            ExitState::Signaled => None,
        }
    }
}

/// Terminal output and status of one worker process.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub status: ExitState,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl InvocationResult {
    /// Apply the completion contract: success yields stdout, anything else
    /// yields the captured stderr (or a generated message when it is empty).
    pub fn into_output(self) -> BridgeResult<String> {
        if self.status.is_success() {
            return Ok(self.stdout);
        }

        let details = if self.stderr.is_empty() {
            match self.status {
                ExitState::Exited(code) => format!("process exited with code {}", code),
                ExitState::Signaled => "process terminated by signal".to_string(),
            }
        } else {
            self.stderr
        };

        Err(BridgeError::Exited {
            code: self.status.code(),
            details,
        })
    }
}
