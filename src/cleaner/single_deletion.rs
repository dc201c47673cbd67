//! Single deletion feature.
//!
//! This module owns deletion of one file or one directory tree, including the
//! bounded retry on files held open by other processes.

use super::classify::{classify, FailureKind};
use super::remover::Remover;
use super::{DeleteError, DeletionEngine};
use std::io;
use std::path::Path;
use std::thread;
use tracing::{debug, error, warn};

/// Non-error result of a deletion primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    SkippedMissing,
    SkippedLocked,
    SkippedPermission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// Book-keeping for one deletion call. Lives only as long as that call.
#[derive(Debug)]
pub struct DeletionAttempt<'a> {
    pub path: &'a Path,
    pub kind: TargetKind,
    pub attempts_made: u32,
    pub last_failure: Option<FailureKind>,
}

impl<'a> DeletionAttempt<'a> {
    pub fn new(path: &'a Path, kind: TargetKind) -> Self {
        Self {
            path,
            kind,
            attempts_made: 0,
            last_failure: None,
        }
    }

    fn record(&mut self, err: &io::Error) -> FailureKind {
        let kind = classify(err);
        self.attempts_made += 1;
        self.last_failure = Some(kind);
        kind
    }
}

impl<R: Remover> DeletionEngine<R> {
    /// Delete a single file.
    ///
    /// A file held open by another process is retried after the configured
    /// backoff, then abandoned with a warning. Permission problems are never
    /// retried. Only unexpected failures come back as `Err`.
    pub fn delete_file(&self, path: &Path) -> Result<DeleteOutcome, DeleteError> {
        self.delete_file_with_retries(path, self.policy.max_lock_retries)
    }

    pub(super) fn delete_file_with_retries(
        &self,
        path: &Path,
        lock_retries: u32,
    ) -> Result<DeleteOutcome, DeleteError> {
        let mut attempt = DeletionAttempt::new(path, TargetKind::File);

        loop {
            let err = match self.remover.remove_file(path) {
                Ok(()) => {
                    debug!(path = %path.display(), "deleted file");
                    return Ok(DeleteOutcome::Deleted);
                }
                Err(err) => err,
            };

            match attempt.record(&err) {
                FailureKind::NotFound => return Ok(DeleteOutcome::SkippedMissing),
                FailureKind::PermissionDenied => {
                    warn!(path = %path.display(), "Access to the file is denied, skipping");
                    return Ok(DeleteOutcome::SkippedPermission);
                }
                FailureKind::Locked if attempt.attempts_made <= lock_retries => {
                    debug!(
                        path = %path.display(),
                        attempt = attempt.attempts_made,
                        "file is in use, retrying in {:?}",
                        self.policy.lock_retry_delay
                    );
                    thread::sleep(self.policy.lock_retry_delay);
                }
                FailureKind::Locked => {
                    warn!(
                        path = %path.display(),
                        attempts = attempt.attempts_made,
                        "File is in use by another process, skipping"
                    );
                    return Ok(DeleteOutcome::SkippedLocked);
                }
                FailureKind::Unexpected => {
                    error!(path = %path.display(), error = %err, "Error deleting file");
                    return Err(DeleteError::Io {
                        path: path.to_path_buf(),
                        source: err,
                    });
                }
            }
        }
    }

    /// Delete a directory and everything below it.
    ///
    /// Best effort: a locked tree is skipped without retry and without a
    /// warning, since the next run will get another chance at it. Whatever
    /// was removed before the failure stays removed.
    pub fn delete_directory_recursive(&self, path: &Path) -> Result<DeleteOutcome, DeleteError> {
        let mut attempt = DeletionAttempt::new(path, TargetKind::Directory);

        let err = match self.remover.remove_dir_all(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted directory");
                return Ok(DeleteOutcome::Deleted);
            }
            Err(err) => err,
        };

        match attempt.record(&err) {
            FailureKind::NotFound => Ok(DeleteOutcome::SkippedMissing),
            FailureKind::Locked => {
                debug!(path = %path.display(), "directory is in use, skipping");
                Ok(DeleteOutcome::SkippedLocked)
            }
            FailureKind::PermissionDenied => {
                warn!(path = %path.display(), "Access to the directory is denied, skipping");
                Ok(DeleteOutcome::SkippedPermission)
            }
            FailureKind::Unexpected => {
                error!(path = %path.display(), error = %err, "Error deleting directory");
                Err(DeleteError::Io {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }
}
