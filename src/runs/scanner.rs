//! Discovery of run directories beneath the base directory

use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::{Run, RunId};

/// List the runs found directly beneath `base_dir`
///
/// Entries that are not directories, or whose names are not
/// `run_YYYYMMDD_HHMMSS` with a valid calendar timestamp, are skipped.
/// Symlinked directories are skipped too, so a deletion can never act
/// through a link. A missing or unreadable base directory yields no runs.
/// The result is in directory-listing order.
pub fn scan_runs(base_dir: &Path, current: &RunId, now: NaiveDateTime) -> Vec<Run> {
    if !base_dir.exists() {
        debug!("Run directory {} does not exist", base_dir.display());
        return Vec::new();
    }

    let entries = match fs::read_dir(base_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error scanning runs directory {}: {}", base_dir.display(), e);
            return Vec::new();
        }
    };

    let mut runs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", base_dir.display(), e);
                continue;
            }
        };

        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {}
            _ => continue,
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let Some((id, created_at)) = RunId::from_dir_name(name) else {
            debug!("Ignoring non-run entry {}", name);
            continue;
        };

        let is_current = &id == current;
        runs.push(Run::new(id, entry.path(), created_at, now, is_current));
    }

    runs
}
