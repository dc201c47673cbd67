//! Cookie and history store operations.

use super::super::context::TaskContext;
use anyhow::Result;
use std::slice;

pub fn clean_cookies(ctx: &TaskContext) -> Result<()> {
    ctx.clean_existing_folders(slice::from_ref(&ctx.paths.cookies), "Cookies");
    Ok(())
}

pub fn clean_history(ctx: &TaskContext) -> Result<()> {
    ctx.clean_existing_folders(slice::from_ref(&ctx.paths.history), "History");
    Ok(())
}
