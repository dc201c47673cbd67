//! Cleanup battery orchestration feature.

use super::context::TaskContext;
use super::operations::{
    clean_cookies, clean_downloads, clean_driver_remnants, clean_history, clean_log_folders,
    clean_temp_folders, clear_event_logs, empty_recycle_bin, flush_dns_cache, purge_stale_files,
    purge_trace_files, run_system_file_checker,
};
use super::result::{CleanupReport, TaskOutcome, TaskReport};
use crate::scheduler::CleanupCycle;
use crate::trash_ops::panic_payload_to_string;
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub type TaskAction = fn(&TaskContext) -> Result<()>;

/// One named entry in the battery.
#[derive(Clone, Copy)]
pub struct CleanupTask {
    pub name: &'static str,
    pub action: TaskAction,
}

impl CleanupTask {
    pub const fn new(name: &'static str, action: TaskAction) -> Self {
        Self { name, action }
    }
}

impl std::fmt::Debug for CleanupTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupTask").field("name", &self.name).finish()
    }
}

/// The battery in execution order. Tasks touch disjoint folders, so the
/// order only affects how the log reads.
pub fn default_tasks() -> Vec<CleanupTask> {
    vec![
        CleanupTask::new("Empty recycle bin", empty_recycle_bin),
        CleanupTask::new("Clean downloads", clean_downloads),
        CleanupTask::new("Clean cookies", clean_cookies),
        CleanupTask::new("Clean remnant driver files", clean_driver_remnants),
        CleanupTask::new("Flush DNS resolver cache", flush_dns_cache),
        CleanupTask::new("Purge old, backup and temporary files", purge_stale_files),
        CleanupTask::new("Purge trace files", purge_trace_files),
        CleanupTask::new("Clean history", clean_history),
        CleanupTask::new("Clean temp folders", clean_temp_folders),
        CleanupTask::new("Clean Windows log folders", clean_log_folders),
        CleanupTask::new("Clear event logs", clear_event_logs),
        CleanupTask::new("Run system file checker", run_system_file_checker),
    ]
}

/// Run one task, turning an error or a panic into a failed outcome.
pub fn run_task(task: &CleanupTask, context: &TaskContext) -> TaskReport {
    let started = Instant::now();
    debug!("{} started", task.name);

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (task.action)(context))) {
        Ok(Ok(())) => TaskOutcome::Success,
        Ok(Err(err)) => {
            error!(task = task.name, "Error in {}: {err:#}", task.name);
            TaskOutcome::Failed(format!("{err:#}"))
        }
        Err(payload) => {
            let msg = panic_payload_to_string(payload);
            error!(task = task.name, "{} crashed: {msg}", task.name);
            TaskOutcome::Failed(format!("panicked: {msg}"))
        }
    };

    TaskReport {
        name: task.name,
        outcome,
        elapsed: started.elapsed(),
    }
}

pub struct CleanupOrchestrator {
    context: TaskContext,
    tasks: Vec<CleanupTask>,
}

impl CleanupOrchestrator {
    pub fn new(context: TaskContext) -> Self {
        Self::with_tasks(context, default_tasks())
    }

    pub fn with_tasks(context: TaskContext, tasks: Vec<CleanupTask>) -> Self {
        Self { context, tasks }
    }

    pub fn tasks(&self) -> &[CleanupTask] {
        &self.tasks
    }

    pub fn context(&self) -> &TaskContext {
        &self.context
    }

    /// Run every task in order, one at a time. Stops before the next task
    /// once `cancel` fires.
    pub fn run_all(&self, cancel: &CancellationToken) -> CleanupReport {
        let mut report = CleanupReport::default();
        for task in &self.tasks {
            if cancel.is_cancelled() {
                info!(
                    remaining = self.tasks.len() - report.tasks.len(),
                    "Shutdown requested, skipping remaining cleanup tasks"
                );
                break;
            }
            report.tasks.push(run_task(task, &self.context));
        }
        report
    }
}

impl CleanupCycle for CleanupOrchestrator {
    fn run_cleanup_tasks(&self, cancel: &CancellationToken) -> bool {
        let report = self.run_all(cancel);
        for failed in report.failed() {
            warn!(task = failed.name, "Cleanup task did not complete");
        }
        let succeeded = report.all_succeeded();
        info!(
            completed = report.tasks.len(),
            failed = report.failed().count(),
            "Cleanup tasks finished{}",
            if succeeded { "" } else { " with errors" }
        );
        succeeded
    }
}
