//! Per-job working directories
//!
//! Every job renders inside its own directory under a shared temporary root.
//! The directory is removed when the job ends: explicitly through
//! [`WorkingDirectory::remove`] on the normal path, or by `Drop` when the job
//! future is cancelled before it gets there.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File the scene source is written to
pub const SCRIPT_NAME: &str = "scene.py";

/// Subdirectory handed to the toolchain as its media root
pub const MEDIA_DIR: &str = "media";

/// Attempts before giving up on finding a free directory name
const MAX_CREATE_ATTEMPTS: usize = 8;

/// Process-wide counter appended to directory names so that jobs started in
/// the same millisecond still get distinct directories.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Errors raised while preparing a working directory
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create temp root {path}: {source}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create working directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write scene source {path}: {source}")]
    WriteSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Generates a directory name `exec_<unix millis>_<sequence>`
pub fn unique_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    format!("exec_{}_{}", millis, sequence)
}

/// A job's isolated directory
///
/// Owned by exactly one job. Removal happens once, either via
/// [`WorkingDirectory::remove`] or on drop.
#[derive(Debug)]
pub struct WorkingDirectory {
    name: String,
    path: PathBuf,
    removed: bool,
}

impl WorkingDirectory {
    /// Creates a fresh, uniquely named directory under `root`
    ///
    /// The root is created if missing. The leaf is created with
    /// `create_dir`, never `create_dir_all`, so an existing directory is
    /// never reused: on a name clash another name is tried.
    pub async fn create(root: &Path) -> Result<Self, WorkspaceError> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| WorkspaceError::CreateRoot {
                path: root.to_path_buf(),
                source,
            })?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let name = unique_name();
            let path = root.join(&name);

            match tokio::fs::create_dir(&path).await {
                Ok(()) => {
                    debug!("Created working directory {}", path.display());
                    return Ok(Self {
                        name,
                        path,
                        removed: false,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < MAX_CREATE_ATTEMPTS => {
                    debug!("Working directory {} already exists, retrying", path.display());
                }
                Err(source) => return Err(WorkspaceError::CreateDir { path, source }),
            }
        }
    }

    /// Directory name, also used as the job identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Media root handed to the toolchain
    pub fn media_dir(&self) -> PathBuf {
        self.path.join(MEDIA_DIR)
    }

    pub fn script_path(&self) -> PathBuf {
        self.path.join(SCRIPT_NAME)
    }

    /// Persists the scene source and returns its path
    pub async fn write_source(&self, source: &str) -> Result<PathBuf, WorkspaceError> {
        let path = self.script_path();
        tokio::fs::write(&path, source.as_bytes())
            .await
            .map_err(|source| WorkspaceError::WriteSource {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Removes the directory tree, best-effort
    ///
    /// Returns `true` when the directory no longer exists afterwards.
    /// Failures are logged, never propagated.
    pub async fn remove(mut self) -> bool {
        self.removed = true;
        let path = self.path.clone();

        match tokio::task::spawn_blocking(move || remove_tree(&path)).await {
            Ok(gone) => gone,
            Err(e) => {
                warn!(
                    "Cleanup task for {} failed: {}, retrying inline",
                    self.path.display(),
                    e
                );
                remove_tree(&self.path)
            }
        }
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if !self.removed {
            debug!(
                "Working directory {} dropped before removal, cleaning up",
                self.path.display()
            );
            remove_tree(&self.path);
        }
    }
}

/// Recursively deletes `path`, continuing past individual failures
///
/// Returns `true` when `path` no longer exists afterwards.
pub fn remove_tree(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }

    if std::fs::remove_dir_all(path).is_ok() {
        return true;
    }

    // Fall back to entry-by-entry removal so one stubborn file does not keep
    // the rest of the tree alive.
    let mut failures = 0usize;
    for entry in WalkDir::new(path).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                failures += 1;
                debug!("Failed to walk {}: {}", path.display(), e);
                continue;
            }
        };

        let result = if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())
        } else {
            std::fs::remove_file(entry.path())
        };

        if let Err(e) = result {
            failures += 1;
            debug!("Failed to remove {}: {}", entry.path().display(), e);
        }
    }

    let gone = !path.exists();
    if !gone {
        warn!(
            "Failed to clean up working directory {} ({} entries could not be removed)",
            path.display(),
            failures
        );
    }

    gone
}
