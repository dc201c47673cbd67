use crate::config::Config;
use crate::logging;
use crate::paths::CleanupPaths;
use crate::scheduler::{self, CleanupCycle, LoopExit, SchedulePolicy};
use crate::tasks::{CleanupOrchestrator, TaskContext};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cleanupd")]
#[command(version)]
#[command(about = "Periodically reclaim disk space and clear transient files on Windows")]
#[command(
    long_about = "cleanupd runs a fixed battery of cleanup tasks (recycle bin, downloads, \
    temp and log folders, stale files, event logs, DNS cache, system file check), then \
    sleeps until the next run. A clean pass waits the long interval; a pass with a failed \
    task retries sooner.\n\n\
    Examples:\n  \
    cleanupd                               # Run as a daemon until stopped\n  \
    cleanupd --once                        # Run the battery once and exit\n  \
    cleanupd --config D:\\cleanupd.toml     # Use a specific config file"
)]
pub struct Cli {
    /// Config file (default: %ProgramData%\cleanupd\config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run the cleanup battery a single time; exit status reflects the result
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub fn run(self) -> ExitCode {
        let config = match Config::load(self.config.as_deref()) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("cleanupd: {:#}", anyhow::Error::from(err));
                return ExitCode::FAILURE;
            }
        };

        match logging::init(&config.logging) {
            Ok(Some(path)) => info!(path = %path.display(), "Writing log file"),
            Ok(None) => {}
            Err(err) => {
                eprintln!("cleanupd: {err:#}");
                return ExitCode::FAILURE;
            }
        }
        info!(version = env!("CARGO_PKG_VERSION"), "cleanupd starting");

        let paths = match CleanupPaths::resolve() {
            Ok(paths) => paths,
            Err(err) => {
                error!("Cannot resolve cleanup folders: {err}");
                return ExitCode::FAILURE;
            }
        };

        let orchestrator = CleanupOrchestrator::new(TaskContext::from_config(&config, paths));

        if self.once {
            return if orchestrator.run_cleanup_tasks(&CancellationToken::new()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("Failed to start async runtime: {err}");
                return ExitCode::FAILURE;
            }
        };
        runtime.block_on(serve(Arc::new(orchestrator), config.schedule_policy()))
    }
}

async fn serve(orchestrator: Arc<CleanupOrchestrator>, policy: SchedulePolicy) -> ExitCode {
    let cancel = CancellationToken::new();

    let signal_token = cancel.clone();
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => signal_token.cancel(),
            // Without a handler the service manager's hard stop is the only way out
            Err(err) => error!("{err:#}"),
        }
    });

    match scheduler::run_loop(orchestrator, policy, cancel).await {
        LoopExit::Stopped => {
            info!("cleanupd stopped");
            ExitCode::SUCCESS
        }
        LoopExit::Fatal(err) => {
            error!("cleanupd exiting after fatal error: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(windows)]
    {
        use tokio::signal::windows::{ctrl_c, ctrl_close, ctrl_shutdown};

        let mut ctrl_c = ctrl_c().context("Failed to install Ctrl+C handler")?;
        let mut close = ctrl_close().context("Failed to install console close handler")?;
        let mut shutdown = ctrl_shutdown().context("Failed to install shutdown handler")?;

        tokio::select! {
            _ = ctrl_c.recv() => info!("Received Ctrl+C"),
            _ = close.recv() => info!("Received console close"),
            _ = shutdown.recv() => info!("Received system shutdown"),
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
