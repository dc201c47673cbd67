//! Flush DNS cache operation.

use super::super::context::TaskContext;
use anyhow::Result;

/// Flush DNS cache using ipconfig /flushdns
pub fn flush_dns_cache(ctx: &TaskContext) -> Result<()> {
    ctx.run_tool(
        "DNS resolver cache flush",
        "ipconfig",
        &["/flushdns"],
        ctx.timeouts.default,
    )?;
    Ok(())
}
