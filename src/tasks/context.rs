//! Collaborators shared by every cleanup task.

use crate::cleaner::{CleanSummary, DeletionEngine, DeletionPolicy};
use crate::config::{Config, ProcessConfig};
use crate::paths::CleanupPaths;
use crate::process::{CommandRunner, ProcessOutcome, SystemCommandRunner};
use crate::trash_ops::{RecycleBin, SystemRecycleBin};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Deadlines for external tools. `None` waits for the tool to exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessTimeouts {
    pub default: Option<Duration>,
    /// The file-integrity scan routinely runs for tens of minutes.
    pub integrity: Option<Duration>,
}

impl Default for ProcessTimeouts {
    fn default() -> Self {
        Self::from(&ProcessConfig::default())
    }
}

impl From<&ProcessConfig> for ProcessTimeouts {
    fn from(config: &ProcessConfig) -> Self {
        Self {
            default: config.timeout(),
            integrity: config.integrity_timeout(),
        }
    }
}

pub struct TaskContext {
    pub engine: DeletionEngine,
    pub paths: CleanupPaths,
    pub runner: Box<dyn CommandRunner>,
    pub recycle_bin: Box<dyn RecycleBin>,
    pub timeouts: ProcessTimeouts,
}

impl TaskContext {
    pub fn new(
        engine: DeletionEngine,
        paths: CleanupPaths,
        runner: Box<dyn CommandRunner>,
        recycle_bin: Box<dyn RecycleBin>,
        timeouts: ProcessTimeouts,
    ) -> Self {
        Self {
            engine,
            paths,
            runner,
            recycle_bin,
            timeouts,
        }
    }

    /// Context wired to the real filesystem, processes and recycle bin.
    pub fn from_config(config: &Config, paths: CleanupPaths) -> Self {
        Self::new(
            DeletionEngine::new(DeletionPolicy::from(&config.deletion)),
            paths,
            Box::new(SystemCommandRunner),
            Box::new(SystemRecycleBin),
            ProcessTimeouts::from(&config.processes),
        )
    }

    /// Empty one folder. An unlistable folder is logged and counted as a
    /// failure in the summary; it never fails the task.
    pub fn clean_folder(&self, path: &Path, label: &str) -> CleanSummary {
        match self.engine.clean_directory_contents(path, label) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    "{label} was not cleaned: {:#}",
                    anyhow::Error::from(err)
                );
                CleanSummary {
                    failed: 1,
                    ..CleanSummary::default()
                }
            }
        }
    }

    /// Clean each folder in `folders` that exists; absent ones are skipped.
    pub fn clean_existing_folders(&self, folders: &[PathBuf], label: &str) -> CleanSummary {
        let mut total = CleanSummary::default();
        for folder in folders {
            if !folder.exists() {
                debug!(path = %folder.display(), "{label} folder not present, skipping");
                continue;
            }
            total.merge(self.clean_folder(folder, label));
        }
        total
    }

    /// Run an external tool to completion.
    ///
    /// Only a failure to start the tool is an error. A nonzero exit code is
    /// logged and accepted, and a tool killed at its deadline is logged as a
    /// warning and left for the next run.
    pub fn run_tool(
        &self,
        description: &str,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutcome> {
        let outcome = self
            .runner
            .run(program, args, timeout)
            .with_context(|| format!("failed to start {program} for {description}"))?;

        match outcome {
            ProcessOutcome::Exited(Some(0)) => info!("{description} completed."),
            ProcessOutcome::Exited(code) => {
                info!(exit_code = ?code, "{description} finished with a nonzero exit status.")
            }
            ProcessOutcome::TimedOut => warn!(
                timeout = ?timeout,
                "{description} did not finish in time and was stopped."
            ),
        }
        Ok(outcome)
    }
}
