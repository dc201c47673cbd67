//! Directory cleaning feature.
//!
//! Empties a folder without removing the folder itself.

use super::classify::{classify, FailureKind};
use super::remover::Remover;
use super::{CleanSummary, DeleteError, DeletionEngine};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

impl<R: Remover> DeletionEngine<R> {
    /// Delete every immediate child of `path`; files through
    /// [`delete_file`](Self::delete_file), subdirectories through
    /// [`delete_directory_recursive`](Self::delete_directory_recursive).
    ///
    /// A missing folder is a no-op. Per-entry failures are counted in the
    /// summary and never fail the call; only an unexpected error while
    /// listing `path` itself comes back as `Err`.
    pub fn clean_directory_contents(
        &self,
        path: &Path,
        label: &str,
    ) -> Result<CleanSummary, DeleteError> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                return match classify(&err) {
                    FailureKind::NotFound => {
                        debug!(path = %path.display(), "{label} folder does not exist, nothing to clean");
                        Ok(CleanSummary::default())
                    }
                    FailureKind::PermissionDenied | FailureKind::Locked => {
                        warn!(path = %path.display(), "Access to the {label} folder is denied");
                        Ok(CleanSummary::default())
                    }
                    FailureKind::Unexpected => {
                        error!(path = %path.display(), error = %err, "Error cleaning {label}");
                        Err(DeleteError::Enumerate {
                            path: path.to_path_buf(),
                            source: err,
                        })
                    }
                };
            }
        };

        let mut summary = CleanSummary::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                    summary.failed += 1;
                    continue;
                }
            };

            let entry_path = entry.path();
            // file_type() does not follow symlinks, so a link to a directory is removed as a link
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let result = if is_dir {
                self.delete_directory_recursive(&entry_path)
            } else {
                self.delete_file(&entry_path)
            };
            summary.record(&result);
        }

        info!(
            path = %path.display(),
            deleted = summary.deleted,
            skipped = summary.skipped,
            failed = summary.failed,
            "{label} cleaned successfully."
        );
        Ok(summary)
    }
}
