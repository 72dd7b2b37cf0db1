//! CLI argument structures
//!
//! This module defines all command-line interface structures used by runkeeper.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::retention::{RetentionMode, RetentionPolicy};
use crate::runs::RunId;

/// Manage retention of timestamped database runs
#[derive(Parser)]
#[command(name = "runkeeper")]
#[command(about = "runkeeper - Manage retention of timestamped database runs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory containing the run_* folders (overrides settings)
    #[arg(short = 'd', long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Path to a TOML settings file
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// ID of the run in use (YYYYMMDD_HHMMSS); defaults to a new ID for now
    #[arg(long, global = true, value_name = "RUN_ID")]
    pub current_run: Option<RunId>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show run count, sizes and ages
    #[command(name = "stats")]
    Stats {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete runs outside the retention policy, after confirmation
    #[command(name = "clean")]
    Clean {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Preview what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,

        /// Automatically answer yes to the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        auto_accept: bool,
    },

    /// Delete every run except the current one, after confirmation
    #[command(name = "purge")]
    Purge {
        /// Preview what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,

        /// Automatically answer yes to the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        auto_accept: bool,
    },

    /// Clean up old runs and create the current run's directory
    #[command(name = "init")]
    Init,
}

/// Retention policy overrides for a single invocation
#[derive(Args, Debug, Default, Clone)]
pub struct PolicyArgs {
    /// Retention mode
    #[arg(long, value_enum)]
    pub mode: Option<RetentionMode>,

    /// Keep runs at most this many days old (<= 0 disables)
    #[arg(long, allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Keep this many of the newest runs (<= 0 disables)
    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<i64>,
}

impl PolicyArgs {
    /// Apply the overrides on top of a configured policy
    pub fn apply(&self, mut policy: RetentionPolicy) -> RetentionPolicy {
        if let Some(mode) = self.mode {
            policy.mode = mode;
            policy.enabled = true;
        }
        if let Some(days) = self.days {
            policy.retention_days = days;
        }
        if let Some(count) = self.count {
            policy.retention_count = count;
        }
        policy
    }
}
