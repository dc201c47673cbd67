//! Raw filesystem removal.
//!
//! The deletion engine never calls `std::fs` removal functions directly; it
//! goes through [`Remover`] so the retry and classification logic can be
//! driven by a fake filesystem in tests.

use crate::utils;
use std::fs;
use std::io;
use std::path::Path;

pub trait Remover: Send + Sync {
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Removes entries from the real filesystem, with long path support.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRemover;

impl Remover for OsRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let target = utils::long_path(path);
        // Directory symlinks and junctions must be removed as directories on Windows
        if utils::is_windows_reparse_point(&target) && target.is_dir() {
            return fs::remove_dir(&target);
        }
        fs::remove_file(&target)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(utils::long_path(path))
    }
}
