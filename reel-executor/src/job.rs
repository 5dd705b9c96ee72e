//! A single render job
//!
//! Binds one piece of scene source to its working directory for the duration
//! of a render. Jobs are never shared: each `execute` call creates one and
//! finishes it.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::workspace::{WorkingDirectory, WorkspaceError};

#[derive(Debug)]
pub struct Job {
    source: String,
    started_at: DateTime<Utc>,
    started: Instant,
    workdir: WorkingDirectory,
}

impl Job {
    /// Starts a job by creating its working directory under `root`
    pub async fn start(root: &Path, source: String) -> Result<Self, WorkspaceError> {
        let workdir = WorkingDirectory::create(root).await?;

        Ok(Self {
            source,
            started_at: Utc::now(),
            started: Instant::now(),
            workdir,
        })
    }

    /// Job identifier, equal to the working directory name
    pub fn id(&self) -> &str {
        self.workdir.name()
    }

    /// Sanitized source that will be rendered
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn workdir(&self) -> &WorkingDirectory {
        &self.workdir
    }

    /// Ends the job, removing its working directory
    ///
    /// Returns whether the directory is gone. A leftover directory is logged
    /// and never turns a result into a failure.
    pub async fn finish(self) -> bool {
        let id = self.workdir.name().to_string();
        let gone = self.workdir.remove().await;
        if !gone {
            warn!("Working directory for job {} could not be fully removed", id);
        }
        gone
    }
}
