//! Presentation layer for run cleanup
//!
//! Pure functions that format stats, plans and results for display. The
//! caller does the printing.

use crate::cleanup::{CleanupPlan, CleanupResult, PlanKind, StorageStats};
use crate::retention::{RetentionMode, RetentionPolicy};
use crate::runs::format_bytes;

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Summary lines: total runs, total size and current run
pub fn format_stats_summary(stats: &StorageStats) -> String {
    format!(
        "📊 Total Runs: {}\n💾 Total Size: {}\n🔄 Current Run: {}\n",
        stats.total_runs,
        stats.total_size_human(),
        stats.current_run
    )
}

/// Per-run table: ID | size | age | current marker
pub fn format_runs_table(stats: &StorageStats) -> String {
    if stats.runs.is_empty() {
        return "No database runs found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Runs:\n");
    output.push_str(&format!("{}\n", rule()));

    for run in &stats.runs {
        let marker = if run.is_current { " ⭐ CURRENT" } else { "" };
        let age = format!("{:.1} days ago", run.age_days);
        output.push_str(&format!(
            "  {} | {:>10} | {:>15}{}\n",
            run.run_id,
            run.size_human(),
            age,
            marker
        ));
    }

    output.push_str(&format!("{}\n", rule()));
    output
}

/// Full stats view
pub fn format_storage_stats(stats: &StorageStats) -> String {
    let mut output = format_stats_summary(stats);
    output.push('\n');
    output.push_str(&format_runs_table(stats));
    if stats.unreadable_entries > 0 {
        output.push_str(&format!(
            "⚠️  {} entries could not be read; sizes may be understated\n",
            stats.unreadable_entries
        ));
    }
    output
}

/// Description of the retention policy
pub fn format_policy(policy: &RetentionPolicy) -> String {
    if !policy.is_active() {
        return "Retention Policy: disabled (no runs will be deleted)\n".to_string();
    }

    let (uses_days, uses_count) = match policy.mode {
        RetentionMode::Days => (true, false),
        RetentionMode::Count => (false, true),
        RetentionMode::Hybrid => (true, true),
    };

    let mut output = format!("Retention Policy: {}\n", policy.mode);
    if uses_days && policy.retention_days > 0 {
        output.push_str(&format!(
            "  - Keep runs from last {} days\n",
            policy.retention_days
        ));
    }
    if uses_count && policy.retention_count > 0 {
        output.push_str(&format!("  - Keep last {} runs\n", policy.retention_count));
    }
    output
}

/// What a plan selects and why
pub fn format_plan(plan: &CleanupPlan) -> String {
    let mut output = match &plan.kind {
        PlanKind::DeleteAll => {
            "⚠️  DELETE ALL mode: Will delete all runs except current\n".to_string()
        }
        PlanKind::Policy { policy } => format_policy(policy),
    };
    output.push('\n');

    if plan.is_empty() {
        let message = match plan.kind {
            PlanKind::DeleteAll => "✅ No runs to delete besides the current run.\n",
            PlanKind::Policy { .. } => "✅ No runs to delete based on current retention policy.\n",
        };
        output.push_str(message);
        return output;
    }

    output.push_str(&format!("Will delete {} run(s):\n", plan.len()));
    for deletion in &plan.deletions {
        output.push_str(&format!(
            "  - {} ({})\n",
            deletion.run.id,
            format_bytes(deletion.size_bytes)
        ));
    }
    output.push_str(&format!(
        "\nSpace to be freed: {}\n",
        format_bytes(plan.total_bytes())
    ));
    output
}

/// Dry-run report
pub fn format_dry_run(plan: &CleanupPlan) -> String {
    format!(
        "DRY RUN: Would delete {} run(s), freeing {}",
        plan.len(),
        format_bytes(plan.total_bytes())
    )
}

/// Outcome of an executed cleanup
pub fn format_cleanup_result(result: &CleanupResult) -> String {
    let mut output = String::new();
    output.push_str("✅ Cleanup complete!\n");
    output.push_str(&format!("   Deleted: {} run(s)\n", result.deleted_count));
    output.push_str(&format!(
        "   Space freed: {}\n",
        result.space_freed_human()
    ));

    if result.has_errors() {
        output.push_str(&format!(
            "\n⚠️  Errors encountered: {}\n",
            result.errors.len()
        ));
        for error in &result.errors {
            output.push_str(&format!("   - {}: {}\n", error.run_id, error.message));
        }
    }
    output
}

/// One-line startup message, only when something was deleted
pub fn format_startup_summary(result: &CleanupResult) -> Option<String> {
    if result.deleted_count == 0 {
        return None;
    }
    Some(format!(
        "🧹 Cleaned up {} old run(s), freed {}",
        result.deleted_count,
        result.space_freed_human()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::{DeletionError, PlannedDeletion, RunStats};
    use crate::retention::DecisionSet;
    use crate::runs::{Run, RunId};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn stats_with(runs: Vec<RunStats>) -> StorageStats {
        StorageStats {
            total_runs: runs.len(),
            total_size_bytes: runs.iter().map(|r| r.size_bytes).sum(),
            current_run: RunId::parse("20250110_120000").unwrap(),
            runs,
            unreadable_entries: 0,
        }
    }

    fn run_stats(id: &str, size_bytes: u64, age_days: f64, is_current: bool) -> RunStats {
        let run_id = RunId::parse(id).unwrap();
        RunStats {
            created_at: run_id.timestamp().unwrap(),
            path: PathBuf::from(run_id.dir_name()),
            run_id,
            age_days,
            size_bytes,
            is_current,
        }
    }

    fn plan_of(kind: PlanKind, ids: &[(&str, u64)]) -> CleanupPlan {
        let now = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        CleanupPlan {
            kind,
            decisions: DecisionSet::default(),
            deletions: ids
                .iter()
                .map(|(id, size_bytes)| {
                    let id = RunId::parse(id).unwrap();
                    let created = id.timestamp().unwrap();
                    PlannedDeletion {
                        run: Run::new(id.clone(), PathBuf::from(id.dir_name()), created, now, false),
                        size_bytes: *size_bytes,
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn test_format_stats_summary() {
        let stats = stats_with(vec![
            run_stats("20250110_120000", 1536, 0.0, true),
            run_stats("20250101_090000", 1024, 9.1, false),
        ]);

        let output = format_stats_summary(&stats);
        assert!(output.contains("Total Runs: 2"));
        assert!(output.contains("Total Size: 2.5 KB"));
        assert!(output.contains("Current Run: 20250110_120000"));
    }

    #[test]
    fn test_format_runs_table() {
        let stats = stats_with(vec![
            run_stats("20250110_120000", 1536, 0.0, true),
            run_stats("20250101_090000", 1_572_864, 9.125, false),
        ]);

        let output = format_runs_table(&stats);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("20250110_120000"));
        assert!(lines[2].contains("1.5 KB"));
        assert!(lines[2].contains("0.0 days ago"));
        assert!(lines[2].contains("CURRENT"));
        assert!(lines[3].contains("1.5 MB"));
        assert!(lines[3].contains("9.1 days ago"));
        assert!(!lines[3].contains("CURRENT"));
    }

    #[test]
    fn test_format_runs_table_empty() {
        let output = format_runs_table(&stats_with(vec![]));
        assert_eq!(output, "No database runs found.\n");
    }

    #[test]
    fn test_format_storage_stats_warns_about_unreadable_entries() {
        let mut stats = stats_with(vec![run_stats("20250110_120000", 10, 0.0, true)]);
        stats.unreadable_entries = 2;

        assert!(format_storage_stats(&stats).contains("2 entries could not be read"));
    }

    #[test]
    fn test_format_policy() {
        let policy = RetentionPolicy {
            enabled: true,
            mode: RetentionMode::Hybrid,
            retention_days: 7,
            retention_count: 3,
        };
        let output = format_policy(&policy);
        assert!(output.contains("Retention Policy: hybrid"));
        assert!(output.contains("last 7 days"));
        assert!(output.contains("last 3 runs"));

        let output = format_policy(&RetentionPolicy {
            retention_count: 0,
            ..policy
        });
        assert!(output.contains("last 7 days"));
        assert!(!output.contains("last 0 runs"));

        assert!(format_policy(&RetentionPolicy::disabled()).contains("disabled"));
    }

    #[test]
    fn test_format_policy_shows_only_dimensions_the_mode_uses() {
        let hybrid = RetentionPolicy::default();

        let days = format_policy(&RetentionPolicy {
            mode: RetentionMode::Days,
            ..hybrid.clone()
        });
        assert!(days.contains("last 7 days"));
        assert!(!days.contains("runs\n"));

        let count = format_policy(&RetentionPolicy {
            mode: RetentionMode::Count,
            ..hybrid
        });
        assert!(count.contains("Keep last 3 runs"));
        assert!(!count.contains("days"));
    }

    #[test]
    fn test_format_plan_lists_runs_and_space() {
        let plan = plan_of(
            PlanKind::Policy {
                policy: RetentionPolicy::default(),
            },
            &[("20250101_000000", 1024), ("20241220_000000", 512)],
        );

        let output = format_plan(&plan);
        assert!(output.contains("Will delete 2 run(s):"));
        assert!(output.contains("  - 20250101_000000 (1.0 KB)"));
        assert!(output.contains("  - 20241220_000000 (512.0 B)"));
        assert!(output.contains("Space to be freed: 1.5 KB"));
    }

    #[test]
    fn test_format_plan_delete_all_and_empty() {
        let output = format_plan(&plan_of(PlanKind::DeleteAll, &[]));
        assert!(output.contains("DELETE ALL mode"));
        assert!(output.contains("No runs to delete"));
    }

    #[test]
    fn test_format_dry_run() {
        let plan = plan_of(PlanKind::DeleteAll, &[("20250101_000000", 2048)]);
        assert_eq!(
            format_dry_run(&plan),
            "DRY RUN: Would delete 1 run(s), freeing 2.0 KB"
        );
    }

    #[test]
    fn test_format_cleanup_result_with_errors() {
        let result = CleanupResult {
            deleted_count: 1,
            space_freed_bytes: 1536,
            deleted_runs: vec![RunId::parse("20250101_000000").unwrap()],
            errors: vec![DeletionError {
                run_id: RunId::parse("20241201_000000").unwrap(),
                message: "Permission denied".to_string(),
            }],
        };

        let output = format_cleanup_result(&result);
        assert!(output.contains("Deleted: 1 run(s)"));
        assert!(output.contains("Space freed: 1.5 KB"));
        assert!(output.contains("Errors encountered: 1"));
        assert!(output.contains("20241201_000000: Permission denied"));
    }

    #[test]
    fn test_format_startup_summary() {
        assert_eq!(format_startup_summary(&CleanupResult::new()), None);

        let mut result = CleanupResult::new();
        result.record_deleted(RunId::parse("20250101_000000").unwrap(), 1_572_864);
        result.record_deleted(RunId::parse("20250102_000000").unwrap(), 0);
        assert_eq!(
            format_startup_summary(&result).as_deref(),
            Some("🧹 Cleaned up 2 old run(s), freed 1.5 MB")
        );
    }
}
