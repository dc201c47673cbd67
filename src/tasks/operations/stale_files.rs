//! Stale and trace file purge operations.

use super::super::context::TaskContext;
use anyhow::Result;
use tracing::info;

/// Leftovers from installers, editors and updaters.
pub const STALE_FILE_PATTERNS: [&str; 3] = ["*.old", "*.bak", "*.tmp"];
pub const TRACE_FILE_PATTERN: &str = "*.trace";

pub fn purge_stale_files(ctx: &TaskContext) -> Result<()> {
    purge(ctx, &STALE_FILE_PATTERNS)
}

pub fn purge_trace_files(ctx: &TaskContext) -> Result<()> {
    purge(ctx, &[TRACE_FILE_PATTERN])
}

fn purge(ctx: &TaskContext, patterns: &[&str]) -> Result<()> {
    let mut deleted = 0;
    for root in &ctx.paths.stale_file_roots {
        deleted += ctx
            .engine
            .delete_files_matching_patterns(root, patterns)?
            .deleted;
    }
    info!(deleted, "Purged {} files.", patterns.join(", "));
    Ok(())
}
