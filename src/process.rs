//! External tool invocation.
//!
//! Tasks such as the DNS flush or the event log purge shell out to system
//! tools. They do it through [`CommandRunner`] so tests can substitute a
//! recording fake for the real processes.

use std::io;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The tool ran to completion. `None` when it was ended by a signal.
    Exited(Option<i32>),
    /// The tool was still running at the deadline and has been killed.
    TimedOut,
}

pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and block until it exits or `timeout` elapses.
    ///
    /// `Err` means the process could not be started or waited on.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> io::Result<ProcessOutcome>;
}

/// Runs tools as hidden child processes with no console window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> io::Result<ProcessOutcome> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn()?;

        let status = match timeout {
            Some(limit) => match child.wait_timeout(limit)? {
                Some(status) => status,
                None => {
                    // Reap the child so it does not linger as a zombie
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(ProcessOutcome::TimedOut);
                }
            },
            None => child.wait()?,
        };

        Ok(ProcessOutcome::Exited(status.code()))
    }
}
