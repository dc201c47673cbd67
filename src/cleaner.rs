//! Resilient deletion engine.
//!
//! Every primitive here absorbs its own failures: locks, permission problems and missing
//! targets are classified and logged, and nothing short of an unexpected I/O
//! failure is reported back to the caller as an error. Partial progress is
//! normal; the next scheduled run picks up whatever was left behind.

mod classify;
mod directory_cleaning;
#[cfg(test)]
mod fake;
mod pattern_deletion;
mod remover;
mod single_deletion;

pub use classify::{classify, is_sharing_violation, FailureKind};
pub use pattern_deletion::compile_patterns;
pub use remover::{OsRemover, Remover};
pub use single_deletion::{DeleteOutcome, DeletionAttempt, TargetKind};

use crate::config::DeletionConfig;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("failed to delete {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list {}", path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid file pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Retry policy for files held open by another process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionPolicy {
    pub lock_retry_delay: Duration,
    /// Retries after the first attempt; total attempts is this plus one.
    pub max_lock_retries: u32,
}

impl Default for DeletionPolicy {
    fn default() -> Self {
        Self {
            lock_retry_delay: Duration::from_millis(500),
            max_lock_retries: 1,
        }
    }
}

impl From<&DeletionConfig> for DeletionPolicy {
    fn from(config: &DeletionConfig) -> Self {
        Self {
            lock_retry_delay: Duration::from_millis(config.lock_retry_delay_ms),
            max_lock_retries: config.max_lock_retries,
        }
    }
}

/// Counters for one directory or pattern clean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub deleted: usize,
    /// Missing, locked or access-denied entries that were left alone.
    pub skipped: usize,
    pub failed: usize,
}

impl CleanSummary {
    pub fn record(&mut self, result: &Result<DeleteOutcome, DeleteError>) {
        match result {
            Ok(DeleteOutcome::Deleted) => self.deleted += 1,
            Ok(_) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: CleanSummary) {
        self.deleted += other.deleted;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

pub struct DeletionEngine<R: Remover = OsRemover> {
    remover: R,
    policy: DeletionPolicy,
}

impl DeletionEngine<OsRemover> {
    pub fn new(policy: DeletionPolicy) -> Self {
        Self::with_remover(OsRemover, policy)
    }
}

impl Default for DeletionEngine<OsRemover> {
    fn default() -> Self {
        Self::new(DeletionPolicy::default())
    }
}

impl<R: Remover> DeletionEngine<R> {
    pub fn with_remover(remover: R, policy: DeletionPolicy) -> Self {
        Self { remover, policy }
    }

    pub fn policy(&self) -> DeletionPolicy {
        self.policy
    }

    pub fn remover(&self) -> &R {
        &self.remover
    }
}
