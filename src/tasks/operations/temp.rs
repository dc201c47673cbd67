//! Temp and prefetch folders operation.

use super::super::context::TaskContext;
use anyhow::Result;

pub fn clean_temp_folders(ctx: &TaskContext) -> Result<()> {
    ctx.clean_existing_folders(&ctx.paths.temp_folders, "Temp");
    Ok(())
}
