//! Recycle bin access through the `trash` crate.
//!
//! On Windows `trash` drives the Shell through COM. If COM was already
//! initialized on the calling thread with a different concurrency model the
//! crate can panic (`CoInitializeEx failed`, HRESULT `0x80010106` /
//! `RPC_E_CHANGED_MODE`). Panics from here are turned into errors so a bad
//! recycle bin never takes the rest of the cleanup battery down with it.

use anyhow::{anyhow, Result};
use std::any::Any;

/// Platform trash/recycle store.
pub trait RecycleBin: Send + Sync {
    /// Permanently purge everything in the store, without any confirmation,
    /// progress or sound UI. Returns the number of purged items.
    fn empty(&self) -> Result<usize>;
}

/// The current user's recycle bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRecycleBin;

impl RecycleBin for SystemRecycleBin {
    fn empty(&self) -> Result<usize> {
        let items = list()?;
        if !items.is_empty() {
            purge_all(&items)?;
        }
        Ok(items.len())
    }
}

pub(crate) fn panic_payload_to_string(panic_payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn catch_trash_panic<R>(f: impl FnOnce() -> Result<R>) -> Result<R> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(panic_payload) => {
            let msg = panic_payload_to_string(panic_payload);
            Err(anyhow!(
                "Recycle Bin operation panicked (dependency bug): {msg}"
            ))
        }
    }
}

#[cfg(any(
    windows,
    all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
))]
fn list() -> Result<Vec<trash::TrashItem>> {
    catch_trash_panic(|| Ok(trash::os_limited::list()?))
}

#[cfg(any(
    windows,
    all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
))]
fn purge_all(items: &[trash::TrashItem]) -> Result<()> {
    catch_trash_panic(|| Ok(trash::os_limited::purge_all(items)?))
}

// No enumeration API for the trash on these platforms
#[cfg(not(any(
    windows,
    all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
)))]
fn list() -> Result<Vec<trash::TrashItem>> {
    Ok(Vec::new())
}

#[cfg(not(any(
    windows,
    all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
)))]
fn purge_all(_items: &[trash::TrashItem]) -> Result<()> {
    Ok(())
}
