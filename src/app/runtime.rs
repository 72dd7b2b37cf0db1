//! Startup hook for the host application's storage initialization
//!
//! Before the current run's directory is created, old runs are cleaned up
//! according to the configured policy. Cleanup is best effort: nothing it
//! does can prevent the current run from being created.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::cleanup::{CleanupOutcome, CleanupResult, RunCleanupManager};
use crate::config::CleanupSettings;
use crate::presentation::format_startup_summary;
use crate::runs::{run_dir, RunId};

/// What happened while preparing the current run's storage
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub run_id: RunId,
    pub run_path: PathBuf,
    /// `None` when cleanup was disabled, timed out or could not run
    pub cleanup: Option<CleanupResult>,
    /// One-line message for display, present when runs were deleted
    pub summary: Option<String>,
}

/// Clean up old runs, then create the directory for `run_id`
///
/// Only a failure to create the run directory is an error.
///
/// When `settings.timeout` elapses first, the cleanup pass keeps running on
/// the blocking pool. Dropping the tokio runtime waits for it; call
/// `Runtime::shutdown_background` to exit without waiting.
pub async fn initialize_run_storage(
    settings: &CleanupSettings,
    run_id: RunId,
) -> Result<StartupReport> {
    let cleanup = if settings.enabled {
        run_startup_cleanup(settings, &run_id).await
    } else {
        debug!("Automatic cleanup disabled");
        None
    };

    let run_path = run_dir(&settings.base_dir, &run_id);
    tokio::fs::create_dir_all(&run_path)
        .await
        .with_context(|| format!("Failed to create run directory {}", run_path.display()))?;
    info!("Run storage initialized at {}", run_path.display());

    let summary = cleanup.as_ref().and_then(format_startup_summary);
    if let Some(summary) = &summary {
        info!("{}", summary);
    }

    Ok(StartupReport {
        run_id,
        run_path,
        cleanup,
        summary,
    })
}

/// Run the blocking cleanup pass, bounded by the configured watchdog
async fn run_startup_cleanup(settings: &CleanupSettings, run_id: &RunId) -> Option<CleanupResult> {
    let manager = RunCleanupManager::new(
        settings.base_dir.clone(),
        run_id.clone(),
        settings.policy(),
    );
    let task = tokio::task::spawn_blocking(move || manager.cleanup_old_runs(false));

    let joined = match settings.timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                // The blocking pass keeps running in the background.
                warn!(
                    "Startup cleanup did not finish within {:?}; continuing without it",
                    limit
                );
                return None;
            }
        },
        None => task.await,
    };

    match joined {
        Ok(CleanupOutcome::Executed(result)) => {
            for failure in &result.errors {
                warn!("Could not delete run {}: {}", failure.run_id, failure.message);
            }
            Some(result)
        }
        Ok(CleanupOutcome::DryRun(_)) => None,
        Err(e) => {
            error!("Startup cleanup failed: {}", e);
            None
        }
    }
}
