//! Run directories and their identifiers
//!
//! A run is one timestamped snapshot directory named `run_YYYYMMDD_HHMMSS`
//! directly beneath the base directory. The run ID is the timestamp part.

pub mod scanner;
pub mod size;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

pub use scanner::scan_runs;
pub use size::{format_bytes, measure_dir, SizeReport};

/// Literal prefix of every run directory name
pub const RUN_PREFIX: &str = "run_";

/// chrono format of the timestamp embedded in a run ID
pub const RUN_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Identifier of a run, e.g. `20250114_093000`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Build the ID for a run created at `now`
    pub fn generate(now: NaiveDateTime) -> Self {
        Self(now.format(RUN_ID_FORMAT).to_string())
    }

    /// Validate a caller-supplied run ID
    pub fn parse(s: &str) -> Result<Self> {
        parse_timestamp(s).ok_or_else(|| Error::InvalidRunId(s.to_string()))?;
        Ok(Self(s.to_string()))
    }

    /// Extract the run ID from a directory name, if the name is a run directory
    pub fn from_dir_name(name: &str) -> Option<(Self, NaiveDateTime)> {
        let id = name.strip_prefix(RUN_PREFIX)?;
        let created_at = parse_timestamp(id)?;
        Some((Self(id.to_string()), created_at))
    }

    /// Creation time encoded in the ID
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name of this run under the base directory
    pub fn dir_name(&self) -> String {
        format!("{}{}", RUN_PREFIX, self.0)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RunId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Structural check first: chrono alone accepts signs and extra year digits.
fn has_run_id_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'_'
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[9..].iter().all(u8::is_ascii_digit)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if !has_run_id_shape(s) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, RUN_ID_FORMAT).ok()
}

/// Path of a run directory beneath `base_dir`
pub fn run_dir(base_dir: &Path, id: &RunId) -> PathBuf {
    base_dir.join(id.dir_name())
}

/// A run directory found on disk, evaluated at a fixed instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub id: RunId,
    pub path: PathBuf,
    pub created_at: NaiveDateTime,
    /// Fractional days between creation and evaluation time
    pub age_days: f64,
    pub is_current: bool,
}

impl Run {
    pub fn new(
        id: RunId,
        path: PathBuf,
        created_at: NaiveDateTime,
        now: NaiveDateTime,
        is_current: bool,
    ) -> Self {
        Self {
            id,
            path,
            created_at,
            age_days: age_in_days(created_at, now),
            is_current,
        }
    }
}

/// Age of something created at `created_at`, in fractional days
pub fn age_in_days(created_at: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let age = now.signed_duration_since(created_at);
    age.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// Newest-first ordering; same-second runs fall back to descending path order
pub fn newest_first(a: &Run, b: &Run) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.path.cmp(&a.path))
}

pub fn sort_newest_first(runs: &mut [Run]) {
    runs.sort_by(newest_first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_generate_run_id() {
        let id = RunId::generate(at(2025, 1, 14, 9, 30, 5));
        assert_eq!(id.as_str(), "20250114_093005");
        assert_eq!(id.dir_name(), "run_20250114_093005");
    }

    #[test]
    fn test_parse_valid_run_id() {
        let id = RunId::parse("20250114_093005").unwrap();
        assert_eq!(id.timestamp(), Some(at(2025, 1, 14, 9, 30, 5)));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in [
            "",
            "20250114",
            "2025011_093005",
            "20250114-093005",
            "20250114_09300a",
            "+2025011_093005",
            "20250114_0930055",
        ] {
            assert!(RunId::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(RunId::parse("20251314_093005").is_err());
        assert!(RunId::parse("20250230_093005").is_err());
        assert!(RunId::parse("20250114_256000").is_err());
    }

    #[test]
    fn test_from_dir_name() {
        let (id, created) = RunId::from_dir_name("run_20240601_120000").unwrap();
        assert_eq!(id.as_str(), "20240601_120000");
        assert_eq!(created, at(2024, 6, 1, 12, 0, 0));

        assert!(RunId::from_dir_name("20240601_120000").is_none());
        assert!(RunId::from_dir_name("snapshot_20240601_120000").is_none());
        assert!(RunId::from_dir_name("run_latest").is_none());
    }

    #[test]
    fn test_age_in_days_is_fractional() {
        let now = at(2025, 1, 10, 12, 0, 0);
        let created = now - Duration::hours(36);
        let age = age_in_days(created, now);
        assert!((age - 1.5).abs() < 1e-9, "age was {}", age);
    }

    #[test]
    fn test_sort_newest_first_breaks_ties_by_path() {
        let now = at(2025, 1, 10, 0, 0, 0);
        let same = at(2025, 1, 9, 0, 0, 0);
        let id = RunId::generate(same);
        let mut runs = vec![
            Run::new(id.clone(), PathBuf::from("/a/run"), same, now, false),
            Run::new(
                RunId::generate(at(2025, 1, 1, 0, 0, 0)),
                PathBuf::from("/old"),
                at(2025, 1, 1, 0, 0, 0),
                now,
                false,
            ),
            Run::new(id, PathBuf::from("/b/run"), same, now, false),
        ];

        sort_newest_first(&mut runs);

        assert_eq!(runs[0].path, PathBuf::from("/b/run"));
        assert_eq!(runs[1].path, PathBuf::from("/a/run"));
        assert_eq!(runs[2].path, PathBuf::from("/old"));
    }
}
