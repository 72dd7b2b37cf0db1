//! Run cleanup: storage statistics, cleanup plans and deletion
//!
//! [`RunCleanupManager`] ties the pieces together:
//!
//! ```text
//! scan_runs ─> measure_dir ─> retention::evaluate ─> (confirm) ─> delete_runs
//! ```
//!
//! Every pass works on a single snapshot of the base directory, taken at
//! one evaluation instant. Nothing here returns an error: unreadable
//! entries degrade to smaller sizes and failed deletions are collected in
//! [`CleanupResult::errors`].

pub mod executor;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::retention::{self, DecisionSet, RetentionPolicy};
use crate::runs::{format_bytes, measure_dir, scan_runs, sort_newest_first, Run, RunId};

pub use executor::delete_runs;

/// Size and age of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub run_id: RunId,
    pub path: PathBuf,
    pub created_at: NaiveDateTime,
    pub age_days: f64,
    pub size_bytes: u64,
    pub is_current: bool,
}

impl RunStats {
    pub fn size_human(&self) -> String {
        format_bytes(self.size_bytes)
    }
}

/// Storage statistics across all runs
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    pub total_runs: usize,
    pub total_size_bytes: u64,
    pub current_run: RunId,
    /// Newest first
    pub runs: Vec<RunStats>,
    /// Files or directories that could not be measured
    pub unreadable_entries: usize,
}

impl StorageStats {
    pub fn total_size_human(&self) -> String {
        format_bytes(self.total_size_bytes)
    }
}

/// Why runs were selected for deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanKind {
    Policy { policy: RetentionPolicy },
    DeleteAll,
}

/// A run selected for deletion, with its size at planning time
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDeletion {
    pub run: Run,
    pub size_bytes: u64,
}

/// Runs that a cleanup would delete, before anything is deleted
#[derive(Debug, Clone, Serialize)]
pub struct CleanupPlan {
    pub kind: PlanKind,
    pub decisions: DecisionSet,
    /// Newest first
    pub deletions: Vec<PlannedDeletion>,
}

impl CleanupPlan {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deletions.len()
    }

    /// Space the plan would free
    pub fn total_bytes(&self) -> u64 {
        self.deletions.iter().map(|d| d.size_bytes).sum()
    }

    pub fn run_ids(&self) -> Vec<&RunId> {
        self.deletions.iter().map(|d| &d.run.id).collect()
    }
}

/// A run that could not be deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionError {
    pub run_id: RunId,
    pub message: String,
}

/// Outcome of a cleanup that actually deleted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub deleted_count: usize,
    pub space_freed_bytes: u64,
    pub deleted_runs: Vec<RunId>,
    pub errors: Vec<DeletionError>,
}

impl CleanupResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_deleted(&mut self, run_id: RunId, bytes: u64) {
        self.deleted_count += 1;
        self.space_freed_bytes += bytes;
        self.deleted_runs.push(run_id);
    }

    pub fn space_freed_human(&self) -> String {
        format_bytes(self.space_freed_bytes)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of [`RunCleanupManager::cleanup_old_runs`]
#[derive(Debug, Clone)]
pub enum CleanupOutcome {
    /// Dry run: what would have been deleted
    DryRun(CleanupPlan),
    Executed(CleanupResult),
}

impl CleanupOutcome {
    /// Runs deleted, or that would be deleted in a dry run
    pub fn deleted_count(&self) -> usize {
        match self {
            Self::DryRun(plan) => plan.len(),
            Self::Executed(result) => result.deleted_count,
        }
    }

    /// Space freed, or that would be freed in a dry run
    pub fn space_freed_bytes(&self) -> u64 {
        match self {
            Self::DryRun(plan) => plan.total_bytes(),
            Self::Executed(result) => result.space_freed_bytes,
        }
    }
}

/// Result of an interactive cleanup
#[derive(Debug, Clone)]
pub enum ManualCleanup {
    NothingToDelete(CleanupPlan),
    Cancelled(CleanupPlan),
    Completed {
        plan: CleanupPlan,
        result: CleanupResult,
    },
}

/// Manager for cleanup of the runs beneath one base directory
pub struct RunCleanupManager {
    base_dir: PathBuf,
    current_run: RunId,
    policy: RetentionPolicy,
    now: Option<NaiveDateTime>,
}

impl RunCleanupManager {
    /// Create a manager protecting `current_run` from deletion
    pub fn new(base_dir: impl Into<PathBuf>, current_run: RunId, policy: RetentionPolicy) -> Self {
        Self {
            base_dir: base_dir.into(),
            current_run,
            policy,
            now: None,
        }
    }

    /// Evaluate ages against a fixed instant instead of the local clock
    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn current_run(&self) -> &RunId {
        &self.current_run
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// One snapshot of all runs, newest first
    pub fn scan(&self) -> Vec<Run> {
        let mut runs = scan_runs(&self.base_dir, &self.current_run, self.now());
        sort_newest_first(&mut runs);
        runs
    }

    /// Get storage statistics for all runs
    pub fn get_storage_stats(&self) -> StorageStats {
        let runs = self.scan();
        let mut unreadable_entries = 0;

        let runs: Vec<RunStats> = runs
            .into_iter()
            .map(|run| {
                let report = measure_dir(&run.path);
                unreadable_entries += report.skipped.len();
                for (path, error) in &report.skipped {
                    debug!("Could not measure {}: {}", path.display(), error);
                }
                RunStats {
                    run_id: run.id,
                    path: run.path,
                    created_at: run.created_at,
                    age_days: run.age_days,
                    size_bytes: report.bytes,
                    is_current: run.is_current,
                }
            })
            .collect();

        StorageStats {
            total_runs: runs.len(),
            total_size_bytes: runs.iter().map(|r| r.size_bytes).sum(),
            current_run: self.current_run.clone(),
            runs,
            unreadable_entries,
        }
    }

    fn plan(&self, kind: PlanKind) -> CleanupPlan {
        let runs = self.scan();
        let decisions = match &kind {
            PlanKind::Policy { policy } => retention::evaluate(&runs, policy),
            PlanKind::DeleteAll => retention::delete_all_except_current(&runs),
        };

        let deletions = runs
            .into_iter()
            .filter(|run| decisions.should_delete(&run.id))
            .map(|run| PlannedDeletion {
                size_bytes: measure_dir(&run.path).bytes,
                run,
            })
            .collect();

        CleanupPlan {
            kind,
            decisions,
            deletions,
        }
    }

    /// Preview a cleanup for confirmation; deletes nothing
    ///
    /// With `delete_all`, every run except the current one is selected
    /// regardless of the retention policy.
    pub fn manual_cleanup(&self, delete_all: bool) -> CleanupPlan {
        if delete_all {
            self.plan(PlanKind::DeleteAll)
        } else {
            self.plan(PlanKind::Policy {
                policy: self.policy.clone(),
            })
        }
    }

    /// Delete old runs according to the retention policy
    pub fn cleanup_old_runs(&self, dry_run: bool) -> CleanupOutcome {
        let plan = self.manual_cleanup(false);

        if dry_run {
            debug!(
                "Dry run: {} run(s) would be deleted, freeing {}",
                plan.len(),
                format_bytes(plan.total_bytes())
            );
            return CleanupOutcome::DryRun(plan);
        }

        CleanupOutcome::Executed(self.execute_plan(&plan))
    }

    /// Perform the deletions of a confirmed plan
    pub fn execute_plan(&self, plan: &CleanupPlan) -> CleanupResult {
        let deletions = plan
            .deletions
            .iter()
            .filter(|d| d.run.id != self.current_run);

        let result = delete_runs(deletions);
        if result.deleted_count > 0 {
            info!(
                "Cleaned up {} run(s) in {}, freed {}",
                result.deleted_count,
                self.base_dir.display(),
                result.space_freed_human()
            );
        }
        result
    }

    /// Preview, confirm and execute a cleanup
    ///
    /// `confirm` is only asked when there is something to delete.
    pub fn run_manual_cleanup<F>(&self, delete_all: bool, confirm: F) -> ManualCleanup
    where
        F: FnOnce(&CleanupPlan) -> bool,
    {
        let plan = self.manual_cleanup(delete_all);

        if plan.is_empty() {
            return ManualCleanup::NothingToDelete(plan);
        }

        if !confirm(&plan) {
            info!("Cleanup cancelled");
            return ManualCleanup::Cancelled(plan);
        }

        let result = self.execute_plan(&plan);
        ManualCleanup::Completed { plan, result }
    }
}
