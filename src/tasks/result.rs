//! Task result feature.

use std::time::Duration;

/// Result of one cleanup task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    /// The task returned an error or panicked; holds the reason.
    Failed(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}

#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Name of the task performed
    pub name: &'static str,
    pub outcome: TaskOutcome,
    pub elapsed: Duration,
}

/// Per-task results of one pass over the battery, in execution order.
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub tasks: Vec<TaskReport>,
}

impl CleanupReport {
    /// True when no task failed. Deletions the engine skipped or could not
    /// perform do not count as task failures.
    pub fn all_succeeded(&self) -> bool {
        self.tasks.iter().all(|t| t.outcome.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TaskReport> {
        self.tasks.iter().filter(|t| !t.outcome.is_success())
    }
}
