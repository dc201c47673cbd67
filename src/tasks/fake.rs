//! Recording collaborators for task tests.

use super::context::{ProcessTimeouts, TaskContext};
use crate::cleaner::{DeletionEngine, DeletionPolicy};
use crate::paths::{CleanupPaths, FolderRoots};
use crate::process::{CommandRunner, ProcessOutcome};
use crate::trash_ops::RecycleBin;
use anyhow::{anyhow, Result};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every command line instead of spawning anything.
#[derive(Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<(String, Option<Duration>)>>>,
    outcome: ProcessOutcome,
    missing: Option<&'static str>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::returning(ProcessOutcome::Exited(Some(0)))
    }
}

impl RecordingRunner {
    pub fn returning(outcome: ProcessOutcome) -> Self {
        Self {
            calls: Arc::default(),
            outcome,
            missing: None,
        }
    }

    /// Fails to start `program` as if it were not installed.
    pub fn missing(program: &'static str) -> Self {
        Self {
            missing: Some(program),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> io::Result<ProcessOutcome> {
        let mut line = vec![program];
        line.extend_from_slice(args);
        self.calls.lock().unwrap().push((line.join(" "), timeout));

        if self.missing == Some(program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
        }
        Ok(self.outcome)
    }
}

#[derive(Clone)]
pub struct FakeRecycleBin {
    items: Arc<AtomicUsize>,
    emptied: Arc<AtomicUsize>,
    broken: bool,
}

impl FakeRecycleBin {
    pub fn holding(items: usize) -> Self {
        Self {
            items: Arc::new(AtomicUsize::new(items)),
            emptied: Arc::default(),
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::holding(0)
        }
    }

    pub fn emptied(&self) -> usize {
        self.emptied.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        self.items.load(Ordering::SeqCst)
    }
}

impl RecycleBin for FakeRecycleBin {
    fn empty(&self) -> Result<usize> {
        if self.broken {
            return Err(anyhow!("SHEmptyRecycleBin returned E_UNEXPECTED"));
        }
        self.emptied.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.swap(0, Ordering::SeqCst))
    }
}

/// A Windows-shaped folder layout rooted at `root`.
pub fn test_roots(root: &Path) -> FolderRoots {
    let user_profile = root.join("Users").join("alice");
    let local_app_data = user_profile.join("AppData").join("Local");
    FolderRoots {
        temp: local_app_data.join("Temp"),
        user_profile,
        local_app_data,
        windows_dir: root.join("Windows"),
        program_data: root.join("ProgramData"),
        system_drive: root.to_path_buf(),
    }
}

pub fn test_context(root: &Path) -> TaskContext {
    TaskContext::new(
        DeletionEngine::new(DeletionPolicy {
            lock_retry_delay: Duration::from_millis(5),
            max_lock_retries: 1,
        }),
        CleanupPaths::from_roots(&test_roots(root)),
        Box::new(RecordingRunner::default()),
        Box::new(FakeRecycleBin::holding(0)),
        ProcessTimeouts::default(),
    )
}
