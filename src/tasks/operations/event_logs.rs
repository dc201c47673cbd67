//! Clear event logs operation.

use super::super::context::TaskContext;
use anyhow::Result;

pub const EVENT_LOG_CHANNELS: [&str; 2] = ["Application", "System"];

/// Clear each channel with `wevtutil cl <channel>`.
pub fn clear_event_logs(ctx: &TaskContext) -> Result<()> {
    for channel in EVENT_LOG_CHANNELS {
        ctx.run_tool(
            &format!("{channel} event log clear"),
            "wevtutil",
            &["cl", channel],
            ctx.timeouts.default,
        )?;
    }
    Ok(())
}
