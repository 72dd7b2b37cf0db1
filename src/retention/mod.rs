//! Retention policy evaluation
//!
//! Decides, for one consistent snapshot of runs, which runs are kept and
//! which are deleted. Everything here is pure: no I/O, no clock access.
//!
//! A run is exempt from deletion by age when it is at most
//! `retention_days` old, and by count when it is among the
//! `retention_count` newest runs. The mode chooses which exemptions apply:
//!
//! | mode     | exempt when        |
//! |----------|--------------------|
//! | `days`   | age                |
//! | `count`  | count              |
//! | `hybrid` | age **or** count   |
//!
//! A threshold `<= 0` disables its exemption. With both thresholds
//! disabled, or `enabled == false`, nothing is deleted at all. The current
//! run is never deleted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::runs::{sort_newest_first, Run, RunId};

/// Which exemptions a policy applies
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RetentionMode {
    /// Keep runs younger than the retention window
    Days,
    /// Keep the N most recent runs
    Count,
    /// Keep runs satisfying either rule
    #[default]
    Hybrid,
}

impl RetentionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Count => "count",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetentionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "days" => Ok(Self::Days),
            "count" => Ok(Self::Count),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// Retention policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Master switch; a disabled policy deletes nothing
    pub enabled: bool,
    pub mode: RetentionMode,
    /// Keep runs at most this many days old (`<= 0` disables)
    pub retention_days: i64,
    /// Keep this many of the newest runs (`<= 0` disables)
    pub retention_count: i64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: RetentionMode::Hybrid,
            retention_days: 7,
            retention_count: 3,
        }
    }
}

impl RetentionPolicy {
    /// Policy that never deletes anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether this policy can delete anything at all
    pub fn is_active(&self) -> bool {
        self.enabled && (self.retention_days > 0 || self.retention_count > 0)
    }

    fn exempt_by_age(&self, run: &Run) -> bool {
        self.retention_days > 0 && run.age_days <= self.retention_days as f64
    }

    fn is_exempt(&self, run: &Run, kept_by_count: &HashSet<RunId>) -> bool {
        let by_age = self.exempt_by_age(run);
        let by_count = kept_by_count.contains(&run.id);

        match self.mode {
            RetentionMode::Days => by_age,
            RetentionMode::Count => by_count,
            RetentionMode::Hybrid => by_age || by_count,
        }
    }

    fn decide(&self, run: &Run, kept_by_count: &HashSet<RunId>) -> bool {
        if run.is_current || !self.is_active() {
            return false;
        }
        !self.is_exempt(run, kept_by_count)
    }
}

/// IDs of the `count` newest runs in `all_runs`, current run included
pub fn runs_kept_by_count(all_runs: &[Run], count: i64) -> HashSet<RunId> {
    if count <= 0 {
        return HashSet::new();
    }

    let mut ordered: Vec<&Run> = all_runs.iter().collect();
    ordered.sort_by(|a, b| crate::runs::newest_first(a, b));
    ordered
        .into_iter()
        .take(usize::try_from(count).unwrap_or(usize::MAX))
        .map(|run| run.id.clone())
        .collect()
}

/// Decide whether a single run should be deleted
///
/// `all_runs` must be the same snapshot `run` was taken from. Prefer
/// [`evaluate`] when deciding for every run, which ranks the snapshot once.
pub fn should_delete(run: &Run, all_runs: &[Run], policy: &RetentionPolicy) -> bool {
    let kept_by_count = runs_kept_by_count(all_runs, policy.retention_count);
    policy.decide(run, &kept_by_count)
}

/// Per-run delete decisions for one snapshot, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecisionSet {
    decisions: Vec<(RunId, bool)>,
}

impl DecisionSet {
    /// Whether the run is marked for deletion; unknown runs are kept
    pub fn should_delete(&self, id: &RunId) -> bool {
        self.decisions
            .iter()
            .any(|(run_id, delete)| run_id == id && *delete)
    }

    /// IDs marked for deletion, newest first
    pub fn to_delete(&self) -> Vec<&RunId> {
        self.decisions
            .iter()
            .filter(|(_, delete)| *delete)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RunId, bool)> {
        self.decisions.iter().map(|(id, delete)| (id, *delete))
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Apply `policy` to every run of one snapshot
pub fn evaluate(all_runs: &[Run], policy: &RetentionPolicy) -> DecisionSet {
    let kept_by_count = runs_kept_by_count(all_runs, policy.retention_count);
    decide_each(all_runs, |run| policy.decide(run, &kept_by_count))
}

/// Mark every run except the current one for deletion
pub fn delete_all_except_current(all_runs: &[Run]) -> DecisionSet {
    decide_each(all_runs, |run| !run.is_current)
}

fn decide_each(all_runs: &[Run], decide: impl Fn(&Run) -> bool) -> DecisionSet {
    let mut ordered = all_runs.to_vec();
    sort_newest_first(&mut ordered);

    DecisionSet {
        decisions: ordered
            .iter()
            .map(|run| (run.id.clone(), decide(run)))
            .collect(),
    }
}
