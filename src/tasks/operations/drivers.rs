//! Leftover driver installer folders operation.

use super::super::context::TaskContext;
use anyhow::Result;

/// Empty the folders GPU and chipset installers unpack to on the system drive.
pub fn clean_driver_remnants(ctx: &TaskContext) -> Result<()> {
    ctx.clean_existing_folders(&ctx.paths.driver_remnants, "Remnant driver files");
    Ok(())
}
