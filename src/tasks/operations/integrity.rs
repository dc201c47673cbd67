//! System file checker operation.

use super::super::context::TaskContext;
use anyhow::Result;

/// Run `sfc /scannow` and wait for it; this takes a long time.
pub fn run_system_file_checker(ctx: &TaskContext) -> Result<()> {
    ctx.run_tool(
        "System file integrity scan",
        "sfc",
        &["/scannow"],
        ctx.timeouts.integrity,
    )?;
    Ok(())
}
