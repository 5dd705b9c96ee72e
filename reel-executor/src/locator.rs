//! Artifact locator
//!
//! The toolchain decides where under the media root the final video lands
//! (`videos/<scene>/<quality>/<Name>.mp4`) and may leave partial movie files
//! next to it. The final cut is the most recently modified match.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// A produced media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
}

/// Finds the newest file with `extension` under `media_dir`
///
/// Returns `None` when the directory does not exist or holds no match.
/// Unreadable entries are skipped.
pub fn find_latest(media_dir: &Path, extension: &str) -> Option<Artifact> {
    if !media_dir.is_dir() {
        debug!("Media directory {} does not exist", media_dir.display());
        return None;
    }

    let mut latest: Option<Artifact> = None;

    for entry in WalkDir::new(media_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable media entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        if latest.as_ref().is_none_or(|current| modified > current.modified) {
            latest = Some(Artifact {
                path: entry.into_path(),
                modified,
                size: metadata.len(),
            });
        }
    }

    if let Some(artifact) = &latest {
        debug!("Located artifact {} ({} bytes)", artifact.path.display(), artifact.size);
    }

    latest
}
