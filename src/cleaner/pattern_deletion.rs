//! Pattern deletion feature.
//!
//! Recursively removes files whose name matches a glob such as `*.tmp`.
//! Several globs are compiled into one `GlobSet` so a tree is walked once
//! no matter how many patterns are purged from it.

use super::remover::Remover;
use super::{CleanSummary, DeleteError, DeletionEngine};
use crate::utils;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Compile file-name globs. Matching ignores case, like the Windows filesystem.
pub fn compile_patterns(patterns: &[&str]) -> Result<GlobSet, DeleteError> {
    let pattern_error = |pattern: &str, source| DeleteError::Pattern {
        pattern: pattern.to_string(),
        source,
    };

    let mut builder = GlobSetBuilder::new();
    for &pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|source| pattern_error(pattern, source))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|source| pattern_error(&patterns.join(", "), source))
}

impl<R: Remover> DeletionEngine<R> {
    /// Delete every file under `directory` whose file name matches `pattern`.
    ///
    /// Subtrees that cannot be read are skipped without logging. Each match
    /// is attempted exactly once; locked and protected files are left behind
    /// for the next run.
    pub fn delete_files_matching_pattern(
        &self,
        directory: &Path,
        pattern: &str,
    ) -> Result<CleanSummary, DeleteError> {
        self.delete_files_matching_patterns(directory, &[pattern])
    }

    /// Same as [`delete_files_matching_pattern`](Self::delete_files_matching_pattern)
    /// for several patterns in a single walk.
    pub fn delete_files_matching_patterns(
        &self,
        directory: &Path,
        patterns: &[&str],
    ) -> Result<CleanSummary, DeleteError> {
        let matcher = compile_patterns(patterns)?;
        let mut summary = CleanSummary::default();

        if !directory.is_dir() {
            return Ok(summary);
        }

        let walker = WalkDir::new(directory)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !utils::is_windows_reparse_point(e.path()));

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
                continue;
            }
            let result = self.delete_file_with_retries(entry.path(), 0);
            summary.record(&result);
        }

        info!(
            deleted = summary.deleted,
            skipped = summary.skipped,
            failed = summary.failed,
            "Files with pattern {} deleted successfully in {}.",
            patterns.join(", "),
            directory.display()
        );
        Ok(summary)
    }
}
