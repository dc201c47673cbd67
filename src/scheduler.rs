//! Scheduler loop.
//!
//! Runs the cleanup battery, waits a long interval after a clean pass or a
//! short one after a failed pass, and repeats until cancelled. A panic that
//! escapes the battery ends the loop with [`LoopExit::Fatal`]; the process
//! entry point turns that into a nonzero exit code so the service manager's
//! recovery policy can restart the daemon.

use crate::trash_ops::panic_payload_to_string;
use anyhow::anyhow;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// One full pass of cleanup work.
pub trait CleanupCycle: Send + Sync + 'static {
    /// Run the battery synchronously; true when every task completed.
    fn run_cleanup_tasks(&self, cancel: &CancellationToken) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub success_interval: Duration,
    pub retry_interval: Duration,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            success_interval: Duration::from_secs(24 * 60 * 60),
            retry_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl SchedulePolicy {
    pub fn next_delay(&self, last_run_succeeded: bool) -> Duration {
        if last_run_succeeded {
            self.success_interval
        } else {
            self.retry_interval
        }
    }
}

/// Recomputed after every cycle, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleState {
    pub last_run_succeeded: bool,
    pub next_delay: Duration,
}

impl ScheduleState {
    pub fn after_run(succeeded: bool, policy: &SchedulePolicy) -> Self {
        Self {
            last_run_succeeded: succeeded,
            next_delay: policy.next_delay(succeeded),
        }
    }
}

#[derive(Debug)]
pub enum LoopExit {
    /// Cancellation was requested; a normal shutdown.
    Stopped,
    /// Something escaped the cleanup battery. The process should exit nonzero.
    Fatal(anyhow::Error),
}

impl LoopExit {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoopExit::Fatal(_))
    }
}

/// Run cleanup cycles until `cancel` fires or a cycle blows up.
///
/// The battery itself runs on the blocking pool, one cycle at a time.
pub async fn run_loop<C: CleanupCycle>(
    cycle: Arc<C>,
    policy: SchedulePolicy,
    cancel: CancellationToken,
) -> LoopExit {
    loop {
        if cancel.is_cancelled() {
            return LoopExit::Stopped;
        }

        info!("Cleanup started at: {}", Local::now().format("%Y-%m-%d %H:%M:%S %:z"));

        let worker = Arc::clone(&cycle);
        let token = cancel.clone();
        let succeeded =
            match tokio::task::spawn_blocking(move || worker.run_cleanup_tasks(&token)).await {
                Ok(succeeded) => succeeded,
                Err(join_err) if join_err.is_panic() => {
                    let msg = panic_payload_to_string(join_err.into_panic());
                    error!("Cleanup cycle crashed: {msg}");
                    return LoopExit::Fatal(anyhow!("cleanup cycle panicked: {msg}"));
                }
                Err(join_err) => {
                    // The runtime is shutting down underneath us
                    info!("Cleanup cycle was cancelled: {join_err}");
                    return LoopExit::Stopped;
                }
            };

        if cancel.is_cancelled() {
            info!("Cleanup stopped by shutdown request");
            return LoopExit::Stopped;
        }

        let state = ScheduleState::after_run(succeeded, &policy);
        info!(
            succeeded = state.last_run_succeeded,
            "Cleanup finished at: {}, next run in {}",
            Local::now().format("%Y-%m-%d %H:%M:%S %:z"),
            humanize(state.next_delay)
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Cleanup stopped by shutdown request");
                return LoopExit::Stopped;
            }
            _ = tokio::time::sleep(state.next_delay) => {}
        }
    }
}

fn humanize(delay: Duration) -> String {
    let secs = delay.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{:?}", delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a scripted list of outcomes and cancels after the last one.
    struct ScriptedCycle {
        outcomes: Mutex<Vec<bool>>,
        calls: AtomicUsize,
        cancel_when_done: CancellationToken,
    }

    impl ScriptedCycle {
        fn new(outcomes: Vec<bool>, cancel: &CancellationToken) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().rev().collect()),
                calls: AtomicUsize::new(0),
                cancel_when_done: cancel.clone(),
            }
        }
    }

    impl CleanupCycle for ScriptedCycle {
        fn run_cleanup_tasks(&self, _cancel: &CancellationToken) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().unwrap();
            let outcome = outcomes.pop().unwrap_or(true);
            if outcomes.is_empty() {
                self.cancel_when_done.cancel();
            }
            outcome
        }
    }

    struct PanickingCycle;

    impl CleanupCycle for PanickingCycle {
        fn run_cleanup_tasks(&self, _cancel: &CancellationToken) -> bool {
            panic!("USERPROFILE vanished");
        }
    }

    #[test]
    fn test_next_delay_policy() {
        let policy = SchedulePolicy {
            success_interval: Duration::from_secs(12 * 3600),
            retry_interval: Duration::from_secs(3600),
        };
        assert_eq!(policy.next_delay(true), Duration::from_secs(12 * 3600));
        assert_eq!(policy.next_delay(false), Duration::from_secs(3600));

        let state = ScheduleState::after_run(false, &policy);
        assert!(!state.last_run_succeeded);
        assert_eq!(state.next_delay, policy.retry_interval);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize(Duration::from_secs(24 * 3600)), "24h");
        assert_eq!(humanize(Duration::from_secs(90 * 60)), "90m");
        assert_eq!(humanize(Duration::from_millis(1500)), "1.5s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_failures_keep_retrying() {
        let cancel = CancellationToken::new();
        let cycle = Arc::new(ScriptedCycle::new(vec![false; 5], &cancel));

        let exit = run_loop(Arc::clone(&cycle), SchedulePolicy::default(), cancel).await;

        assert!(matches!(exit, LoopExit::Stopped));
        assert_eq!(cycle.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_uses_retry_interval() {
        let policy = SchedulePolicy {
            success_interval: Duration::from_secs(24 * 3600),
            retry_interval: Duration::from_secs(3600),
        };
        let cancel = CancellationToken::new();
        let cycle = Arc::new(ScriptedCycle::new(vec![false, true], &cancel));

        let started = tokio::time::Instant::now();
        let exit = run_loop(Arc::clone(&cycle), policy, cancel).await;

        assert!(matches!(exit, LoopExit::Stopped));
        // One retry sleep after the failed pass, none after the cancelling pass
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3600));
        assert!(elapsed < Duration::from_secs(3601));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_uses_long_interval() {
        let policy = SchedulePolicy {
            success_interval: Duration::from_secs(24 * 3600),
            retry_interval: Duration::from_secs(3600),
        };
        let cancel = CancellationToken::new();
        let cycle = Arc::new(ScriptedCycle::new(vec![true, true], &cancel));

        let started = tokio::time::Instant::now();
        run_loop(Arc::clone(&cycle), policy, cancel).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(24 * 3600));
        assert!(elapsed < Duration::from_secs(24 * 3600 + 1));
    }

    #[tokio::test]
    async fn test_cancel_during_sleep_exits_promptly() {
        let cancel = CancellationToken::new();
        // More outcomes than will ever run, so the cycle never cancels by itself
        let cycle = Arc::new(ScriptedCycle::new(vec![true; 10], &CancellationToken::new()));

        let handle = tokio::spawn(run_loop(
            Arc::clone(&cycle),
            SchedulePolicy::default(),
            cancel.clone(),
        ));

        while cycle.calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        cancel.cancel();

        let exit = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop ignored cancellation")
            .unwrap();
        assert!(matches!(exit, LoopExit::Stopped));
        assert_eq!(cycle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let cycle = Arc::new(ScriptedCycle::new(vec![true], &CancellationToken::new()));

        let exit = run_loop(Arc::clone(&cycle), SchedulePolicy::default(), cancel).await;

        assert!(matches!(exit, LoopExit::Stopped));
        assert_eq!(cycle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panic_in_cycle_is_fatal() {
        let exit = run_loop(
            Arc::new(PanickingCycle),
            SchedulePolicy::default(),
            CancellationToken::new(),
        )
        .await;

        assert!(exit.is_fatal());
        if let LoopExit::Fatal(err) = exit {
            assert!(err.to_string().contains("USERPROFILE vanished"));
        }
    }
}
