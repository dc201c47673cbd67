//! Empty recycle bin operation.

use super::super::context::TaskContext;
use anyhow::{Context, Result};
use tracing::info;

/// Permanently purge the recycle bin. Nothing is shown to the user.
pub fn empty_recycle_bin(ctx: &TaskContext) -> Result<()> {
    let purged = ctx
        .recycle_bin
        .empty()
        .context("failed to empty the recycle bin")?;
    info!(items = purged, "Recycle bin emptied successfully.");
    Ok(())
}
