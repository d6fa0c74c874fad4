//! Worker process execution.
//!
//! # Responsibilities
//! - Spawn one process per invocation with piped stdio
//! - Deliver the optional payload over stdin, then close it
//! - Drain stdout and stderr to completion into separate buffers
//! - Enforce the worker deadline and the concurrency bound
//! - Run each worker in its own process group so a deadline kill also
//!   reaches anything the worker started

use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tokio::sync::Semaphore;

use crate::bridge::error::{BridgeError, BridgeResult};
use crate::bridge::invocation::{ExitState, InvocationResult, InvocationSpec};
use crate::config::LimitsConfig;
use crate::observability::metrics;

/// Runs worker programs on behalf of request handlers.
///
/// Cheap to share behind an `Arc`; holds no per-invocation state.
#[derive(Debug)]
pub struct ProcessBridge {
    permits: Arc<Semaphore>,
    max_workers: usize,
    timeout: Duration,
}

impl ProcessBridge {
    /// Create a bridge from the configured limits.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self::with_limits(
            limits.max_concurrent_workers,
            Duration::from_secs(limits.worker_timeout_secs),
        )
    }

    /// `max_workers` is clamped to what a semaphore can hold.
    pub fn with_limits(max_workers: usize, timeout: Duration) -> Self {
        let max_workers = max_workers.min(Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            timeout,
        }
    }

    /// Run the worker and return its output if it exited with code zero.
    pub async fn run(&self, spec: &InvocationSpec) -> BridgeResult<String> {
        self.execute(spec).await?.into_output()
    }

    /// Run the worker to completion and capture its status and both streams.
    ///
    /// Waits for a free worker slot first. Launch failures, deadline
    /// expiry and a closed bridge are errors; a non-zero exit is a normal
    /// result.
    pub async fn execute(&self, spec: &InvocationSpec) -> BridgeResult<InvocationResult> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| BridgeError::Unavailable)?;

        let start = Instant::now();
        let outcome = self.spawn_and_wait(spec, start).await;
        metrics::record_invocation(invocation_outcome(&outcome), start.elapsed());

        match &outcome {
            Ok(result) => tracing::debug!(
                program = %spec.program,
                exit_code = ?result.status.code(),
                stdout_bytes = result.stdout.len(),
                stderr_bytes = result.stderr.len(),
                elapsed_ms = result.elapsed.as_millis() as u64,
                "Worker finished"
            ),
            Err(e) => tracing::warn!(
                program = %spec.program,
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Worker invocation failed"
            ),
        }

        outcome
    }

    async fn spawn_and_wait(
        &self,
        spec: &InvocationSpec,
        start: Instant,
    ) -> BridgeResult<InvocationResult> {
        let mut command = spec.program.to_command();
        command
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(BridgeError::Launch)?;
        let _in_flight = metrics::WorkerGuard::new();

        tracing::debug!(
            program = %spec.program,
            args = spec.args.len(),
            has_payload = spec.payload.is_some(),
            pid = ?child.id(),
            "Worker started"
        );

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let completed = tokio::time::timeout(self.timeout, async {
            tokio::try_join!(
                feed_stdin(stdin, spec.payload.as_deref()),
                child.wait(),
                read_stream(stdout),
                read_stream(stderr),
            )
        })
        .await;

        match completed {
            Ok(Ok(((), status, stdout, stderr))) => Ok(InvocationResult {
                status: ExitState::from(status),
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                elapsed: start.elapsed(),
            }),
            Ok(Err(e)) => Err(BridgeError::Io(e)),
            Err(_elapsed) => {
                kill_worker(&mut child);
                let _ = child.wait().await;
                Err(BridgeError::TimedOut {
                    after: self.timeout,
                })
            }
        }
    }

    /// Stop admitting invocations. Running workers finish; callers still
    /// waiting for a slot get [`BridgeError::Unavailable`].
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Configured worker deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Configured maximum of simultaneous workers.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Worker slots currently free.
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Kill the worker's whole process group, then the worker itself in case
/// the group is already gone.
fn kill_worker(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                tracing::debug!(pid, error = %e, "killpg failed");
            }
        }
    }

    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "Worker already exited before kill");
    }
}

fn invocation_outcome(outcome: &BridgeResult<InvocationResult>) -> &'static str {
    match outcome {
        Ok(result) if result.status.is_success() => "success",
        Ok(_) => "exit_failure",
        Err(BridgeError::Launch(_)) => "launch_failure",
        Err(BridgeError::TimedOut { .. }) => "timeout",
        Err(BridgeError::Unavailable) => "unavailable",
        Err(_) => "io_failure",
    }
}

/// Write the payload line and close stdin. A worker that exits without
/// reading its input is not an error here; its exit status decides.
async fn feed_stdin(stdin: Option<ChildStdin>, payload: Option<&str>) -> std::io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };

    if let Some(payload) = payload {
        let written = async {
            stdin.write_all(payload.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await
        }
        .await;

        match written {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!("Worker closed stdin before reading the payload");
            }
            other => other?,
        }
    }

    drop(stdin);
    Ok(())
}

async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut handle) = handle {
        handle.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
