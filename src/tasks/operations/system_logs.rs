//! Windows log folders operation.

use super::super::context::TaskContext;
use anyhow::Result;

/// Empty Logs, Panther, the update download cache and WER temp.
pub fn clean_log_folders(ctx: &TaskContext) -> Result<()> {
    ctx.clean_existing_folders(&ctx.paths.log_folders, "Windows logs");
    Ok(())
}
