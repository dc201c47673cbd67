//! Cleanup task features.

pub mod browser;
pub mod downloads;
pub mod drivers;
pub mod empty_recycle_bin;
pub mod event_logs;
pub mod flush_dns_cache;
pub mod integrity;
pub mod stale_files;
pub mod system_logs;
pub mod temp;

pub use browser::{clean_cookies, clean_history};
pub use downloads::clean_downloads;
pub use drivers::clean_driver_remnants;
pub use empty_recycle_bin::empty_recycle_bin;
pub use event_logs::clear_event_logs;
pub use flush_dns_cache::flush_dns_cache;
pub use integrity::run_system_file_checker;
pub use stale_files::{purge_stale_files, purge_trace_files};
pub use system_logs::clean_log_folders;
pub use temp::clean_temp_folders;
