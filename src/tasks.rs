//! Cleanup battery.
//!
//! The fixed, ordered set of maintenance tasks run on every cycle:
//! - Recycle bin purge
//! - Downloads, cookie and history folders
//! - Leftover vendor driver folders
//! - DNS resolver cache flush
//! - `*.old` / `*.bak` / `*.tmp` and `*.trace` purges
//! - Temp and prefetch folders
//! - Windows log folders and event logs
//! - System file checker

mod context;
#[cfg(test)]
mod fake;
mod operations;
mod result;
mod run;

pub use context::{ProcessTimeouts, TaskContext};
pub use operations::{
    clean_cookies, clean_downloads, clean_driver_remnants, clean_history, clean_log_folders,
    clean_temp_folders, clear_event_logs, empty_recycle_bin, flush_dns_cache,
    purge_stale_files, purge_trace_files, run_system_file_checker,
};
pub use result::{CleanupReport, TaskOutcome, TaskReport};
pub use run::{default_tasks, run_task, CleanupOrchestrator, CleanupTask, TaskAction};
