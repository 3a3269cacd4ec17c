//! Scoped restoration of the manifest mutated by installation.
//!
//! Pinned installs rewrite the working tree's manifest. The guard snapshots
//! it before installation begins and puts it back when the run reaches its
//! terminal state, whatever that state is.

use std::path::PathBuf;
use tracing::{debug, warn};

/// Snapshot of the manifest file, restored exactly once.
///
/// `restore` is idempotent; a `Drop` backstop covers panics and early
/// returns. Restoration failures are logged, never propagated, so they
/// cannot mask the run's own result.
#[derive(Debug)]
pub struct ManifestGuard {
    path: PathBuf,
    /// Manifest bytes at acquisition; `None` when no manifest existed yet.
    original: Option<Vec<u8>>,
    restored: bool,
}

impl ManifestGuard {
    /// Snapshot the manifest at `path` before installation mutates it.
    pub fn acquire(path: PathBuf) -> std::io::Result<Self> {
        let original = match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        debug!(manifest = %path.display(), "snapshotted manifest");
        Ok(Self {
            path,
            original,
            restored: false,
        })
    }

    /// Put the manifest back to its snapshotted state. Subsequent calls
    /// are no-ops.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let result = match &self.original {
            Some(bytes) => std::fs::write(&self.path, bytes),
            // No manifest existed: remove whatever installation created.
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        match result {
            Ok(()) => debug!(manifest = %self.path.display(), "restored manifest"),
            Err(e) => warn!(
                manifest = %self.path.display(),
                error = %e,
                "failed to restore manifest"
            ),
        }
    }
}

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
