//! cleanupd library crate
//!
//! The deletion engine, cleanup battery and scheduler behind the `cleanupd`
//! daemon, usable on their own for programmatic cleanup runs.

pub mod cleaner;
pub mod cli;
pub mod config;
pub mod logging;
pub mod paths;
pub mod process;
pub mod scheduler;
pub mod tasks;
pub mod trash_ops;
pub mod utils;
