//! Clear downloads operation.

use super::super::context::TaskContext;
use anyhow::Result;

pub fn clean_downloads(ctx: &TaskContext) -> Result<()> {
    ctx.clean_folder(&ctx.paths.downloads, "Downloads");
    Ok(())
}
