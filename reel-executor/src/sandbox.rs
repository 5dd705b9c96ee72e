//! Render sandbox
//!
//! Runs the rendering toolchain as a child process inside a job's working
//! directory:
//! - Writing the scene source to the working directory
//! - Spawning `<program> <args> -ql --media_dir <dir>/media <script> <entry point>`
//! - Capturing stdout/stderr while waiting under the configured timeout
//! - Killing the whole process group when the timeout fires or the job
//!   future is dropped
//!
//! Isolation is per-process and per-directory only.

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ExecutorConfig;
use crate::limits;
use crate::workspace::{WorkingDirectory, WorkspaceError};

/// How long to keep draining output pipes after the child is gone
const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// How a render process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The process exited on its own with this code (-1 when killed by a signal)
    Exited(i32),
    /// The timeout elapsed and the process was killed
    TimedOut,
    /// Orchestrating the process failed (I/O, spawn, permissions)
    Faulted(String),
}

/// Raw outcome of one render attempt
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub termination: Termination,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ExecutionOutcome {
    /// An outcome for a fault that happened before any output was captured
    pub fn fault(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            termination: Termination::Faulted(message.into()),
            stdout: String::new(),
            stderr: String::new(),
            elapsed,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.termination {
            Termination::Exited(code) => Some(code),
            _ => None,
        }
    }

    /// Whether the process exited with code 0
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code() == Some(0)
    }

    /// Turns this outcome into a fault, keeping captured output
    pub fn into_fault(self, message: impl Into<String>) -> Self {
        Self {
            termination: Termination::Faulted(message.into()),
            ..self
        }
    }
}

/// Errors raised while orchestrating the render process
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for render process: {0}")]
    Wait(#[source] std::io::Error),
}

/// Runs render processes according to an [`ExecutorConfig`]
#[derive(Debug, Clone)]
pub struct Sandbox {
    config: ExecutorConfig,
}

impl Sandbox {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Builds the toolchain command for `workdir`
    pub fn command(&self, workdir: &WorkingDirectory, script: &Path) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.program_args)
            .arg(&self.config.quality_flag)
            .arg("--media_dir")
            .arg(workdir.media_dir())
            .arg(script)
            .arg(&self.config.entry_point)
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        limits::install(&mut command, self.config.limits);

        command
    }

    /// Renders `source` inside `workdir`
    ///
    /// Never fails: orchestration errors come back as
    /// [`Termination::Faulted`], timeouts as [`Termination::TimedOut`].
    pub async fn run(&self, workdir: &WorkingDirectory, source: &str) -> ExecutionOutcome {
        let started = Instant::now();

        match self.try_run(workdir, source, started).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Render in {} faulted: {}", workdir.name(), e);
                ExecutionOutcome::fault(e.to_string(), started.elapsed())
            }
        }
    }

    async fn try_run(
        &self,
        workdir: &WorkingDirectory,
        source: &str,
        started: Instant,
    ) -> Result<ExecutionOutcome, SandboxError> {
        let script = workdir.write_source(source).await?;

        let mut child = self
            .command(workdir, &script)
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let pid = child.id();
        let mut group = ProcessGroupGuard::new(pid);
        debug!("Spawned render process {:?} in {}", pid, workdir.name());

        let cap = self.config.max_output_bytes;
        let stdout_task = tokio::spawn(read_capped(child.stdout.take(), cap));
        let stderr_task = tokio::spawn(read_capped(child.stderr.take(), cap));

        let termination = match tokio::time::timeout(self.config.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let code = status.code().unwrap_or(-1);
                debug!("Render process exited with {}", status);
                Termination::Exited(code)
            }
            Ok(Err(e)) => {
                terminate(&mut child, pid).await;
                group.disarm();
                stdout_task.abort();
                stderr_task.abort();
                return Err(SandboxError::Wait(e));
            }
            Err(_) => {
                info!(
                    "Render in {} exceeded {:?}, killing process group",
                    workdir.name(),
                    self.config.timeout
                );
                terminate(&mut child, pid).await;
                Termination::TimedOut
            }
        };
        group.disarm();

        let stdout = collect(stdout_task).await;
        let stderr = collect(stderr_task).await;

        Ok(ExecutionOutcome {
            termination,
            stdout,
            stderr,
            elapsed: started.elapsed(),
        })
    }
}

/// Kills the render's process group when dropped while still armed
///
/// Covers the path where the job future is cancelled mid-render, which
/// otherwise only gets `kill_on_drop` for the direct child. Must be declared
/// after the [`Child`] so it runs before the child is dropped.
struct ProcessGroupGuard {
    pid: Option<u32>,
    armed: bool,
}

impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self { pid, armed: true }
    }

    /// The child has been reaped; its pid may be reused from here on
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        #[cfg(unix)]
        if let Some(pid) = self.pid {
            debug!("Render dropped mid-flight, killing process group {}", pid);
            if let Err(e) = limits::kill_process_group(pid) {
                warn!("Failed to kill process group {}: {}", pid, e);
            }
        }
    }
}

/// Kills the child and its process group, then reaps it
async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        if let Err(e) = limits::kill_process_group(pid) {
            warn!("Failed to kill process group {}: {}", pid, e);
        }
    }
    #[cfg(not(unix))]
    let _ = pid;

    if let Err(e) = child.kill().await {
        debug!("Failed to kill render process: {}", e);
    }
}

/// Reads a stream to EOF, keeping the last `cap` bytes
///
/// Tracebacks end the stream, so older bytes are dropped from the front.
/// Everything is read so the child never blocks on a full pipe.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut kept = VecDeque::new();
    let Some(mut reader) = reader else {
        return Vec::new();
    };

    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                kept.extend(&chunk[..n]);
                if kept.len() > cap {
                    kept.drain(..kept.len() - cap);
                }
            }
            Err(e) => {
                debug!("Error reading render output: {}", e);
                break;
            }
        }
    }

    Vec::from(kept)
}

/// Waits briefly for a reader task and decodes what it captured
///
/// Grandchildren that outlive the render can hold the pipe open; after the
/// grace period whatever has not arrived is given up on.
async fn collect(task: JoinHandle<Vec<u8>>) -> String {
    let abort = task.abort_handle();
    match tokio::time::timeout(DRAIN_GRACE, task).await {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        Ok(Err(e)) => {
            debug!("Output reader task failed: {}", e);
            String::new()
        }
        Err(_) => {
            abort.abort();
            debug!("Output pipe still open after {:?}, giving up", DRAIN_GRACE);
            String::new()
        }
    }
}
