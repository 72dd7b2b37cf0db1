//! Deletion of run directories

use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info, warn};

use super::{CleanupResult, DeletionError, PlannedDeletion};
use crate::runs::format_bytes;

/// Remove each planned run directory, continuing past failures
///
/// Freed space is the size recorded when the plan was built; directories
/// are not walked again here. A directory that has already disappeared is
/// neither counted nor reported as an error. The current run is never
/// touched.
pub fn delete_runs<'a>(deletions: impl IntoIterator<Item = &'a PlannedDeletion>) -> CleanupResult {
    let mut result = CleanupResult::new();

    for PlannedDeletion { run, size_bytes } in deletions {
        if run.is_current {
            warn!("Refusing to delete current run {}", run.id);
            continue;
        }

        match fs::remove_dir_all(&run.path) {
            Ok(()) => {
                info!("Deleted: {} ({})", run.id, format_bytes(*size_bytes));
                result.record_deleted(run.id.clone(), *size_bytes);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Run {} already removed", run.id);
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", run.id, e);
                result.errors.push(DeletionError {
                    run_id: run.id.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::{measure_dir, Run, RunId};
    use chrono::NaiveDate;
    use std::path::Path;
    use tempfile::TempDir;

    fn run_at(base: &Path, id: &str, is_current: bool) -> Run {
        let id = RunId::parse(id).unwrap();
        let created = id.timestamp().unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Run::new(id.clone(), base.join(id.dir_name()), created, now, is_current)
    }

    fn populate(run: &Run, bytes: usize) {
        fs::create_dir_all(run.path.join("index")).unwrap();
        fs::write(run.path.join("index/data.bin"), vec![1u8; bytes]).unwrap();
    }

    fn planned(run: &Run) -> PlannedDeletion {
        PlannedDeletion {
            run: run.clone(),
            size_bytes: measure_dir(&run.path).bytes,
        }
    }

    #[test]
    fn test_delete_runs_reports_freed_space() {
        let temp_dir = TempDir::new().unwrap();
        let a = run_at(temp_dir.path(), "20250101_000000", false);
        let b = run_at(temp_dir.path(), "20250102_000000", false);
        populate(&a, 100);
        populate(&b, 250);

        let result = delete_runs(&[planned(&a), planned(&b)]);

        assert_eq!(result.deleted_count, 2);
        assert_eq!(result.space_freed_bytes, 350);
        assert_eq!(result.deleted_runs, vec![a.id.clone(), b.id.clone()]);
        assert!(result.errors.is_empty());
        assert!(!a.path.exists());
        assert!(!b.path.exists());
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let broken = run_at(temp_dir.path(), "20250101_000000", false);
        let good = run_at(temp_dir.path(), "20250102_000000", false);
        // remove_dir_all refuses a plain file
        fs::write(&broken.path, "not a directory").unwrap();
        populate(&good, 10);

        let result = delete_runs(&[planned(&broken), planned(&good)]);

        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.deleted_runs, vec![good.id.clone()]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].run_id, broken.id);
        assert!(!result.errors[0].message.is_empty());
        assert!(broken.path.exists());
        assert!(!good.path.exists());
    }

    #[test]
    fn test_already_removed_run_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let gone = run_at(temp_dir.path(), "20250101_000000", false);

        let result = delete_runs(&[planned(&gone)]);

        assert_eq!(result.deleted_count, 0);
        assert_eq!(result.space_freed_bytes, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_current_run_is_never_removed() {
        let temp_dir = TempDir::new().unwrap();
        let current = run_at(temp_dir.path(), "20250101_000000", true);
        populate(&current, 10);

        let result = delete_runs(&[planned(&current)]);

        assert_eq!(result.deleted_count, 0);
        assert!(current.path.exists());
    }

    #[test]
    fn test_freed_space_comes_from_the_plan() {
        let temp_dir = TempDir::new().unwrap();
        let run = run_at(temp_dir.path(), "20250101_000000", false);
        populate(&run, 10);

        // Files added after planning are removed but not reported
        let deletion = planned(&run);
        fs::write(run.path.join("late.bin"), vec![0u8; 4096]).unwrap();

        let result = delete_runs([&deletion]);

        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.space_freed_bytes, 10);
        assert!(!run.path.exists());
    }
}
