//! Scripted [`Remover`] for exercising the retry and classification paths.

use super::remover::{OsRemover, Remover};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

type Script = Box<dyn Fn(&Path, usize) -> Option<io::ErrorKind> + Send + Sync>;

/// Fails removals according to a script; calls the script lets through hit
/// the real filesystem. Every call is recorded with its timestamp.
pub(crate) struct ScriptedRemover {
    script: Script,
    calls: Mutex<Vec<(PathBuf, Instant)>>,
}

impl ScriptedRemover {
    pub(crate) fn new(
        script: impl Fn(&Path, usize) -> Option<io::ErrorKind> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `kind`.
    pub(crate) fn always(kind: io::ErrorKind) -> Self {
        Self::new(move |_, _| Some(kind))
    }

    /// The first `failures` calls fail with `kind`, later ones succeed.
    pub(crate) fn failing_first(kind: io::ErrorKind, failures: usize) -> Self {
        Self::new(move |_, call| (call < failures).then_some(kind))
    }

    /// Entries with this file name fail with `kind`; everything else is removed for real.
    pub(crate) fn failing_name(name: &'static str, kind: io::ErrorKind) -> Self {
        Self::new(move |path, _| {
            (path.file_name().and_then(|n| n.to_str()) == Some(name)).then_some(kind)
        })
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    fn step(&self, path: &Path) -> io::Result<()> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((path.to_path_buf(), Instant::now()));
            calls.len() - 1
        };
        match (self.script)(path, call) {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(()),
        }
    }
}

impl Remover for ScriptedRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.step(path)?;
        if path.exists() {
            OsRemover.remove_file(path)?;
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.step(path)?;
        if path.exists() {
            OsRemover.remove_dir_all(path)?;
        }
        Ok(())
    }
}

/// Permission bits do not stop root, so mode-based tests are meaningless there.
#[cfg(unix)]
pub(crate) fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}
