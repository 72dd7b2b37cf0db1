//! Clean command implementation for managing run storage
//!
//! Shows the current runs, previews what would be deleted and asks for
//! confirmation before deleting anything.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::warn;

use super::CommandContext;
use crate::cleanup::ManualCleanup;
use crate::presentation::{
    format_cleanup_result, format_dry_run, format_plan, format_storage_stats,
};
use crate::retention::RetentionPolicy;

/// Execute the clean (or, with `delete_all`, purge) command
pub fn run_clean_command(
    ctx: &CommandContext,
    policy: RetentionPolicy,
    delete_all: bool,
    dry_run: bool,
    auto_accept: bool,
) -> Result<()> {
    let manager = ctx.manager(policy);
    let banner = "=".repeat(80);

    println!("{}", banner);
    println!("DATABASE CLEANUP");
    println!("{}", banner);
    println!();

    let stats = manager.get_storage_stats();
    if stats.total_runs == 0 {
        println!("No database runs found.");
        return Ok(());
    }

    print!("{}", format_storage_stats(&stats));
    println!();

    if dry_run {
        let plan = manager.manual_cleanup(delete_all);
        print!("{}", format_plan(&plan));
        println!();
        println!("{}", format_dry_run(&plan));
        return Ok(());
    }

    let outcome = manager.run_manual_cleanup(delete_all, |plan| {
        print!("{}", format_plan(plan));
        println!();
        auto_accept || confirm_from(&mut io::stdin().lock())
    });

    match outcome {
        ManualCleanup::NothingToDelete(plan) => print!("{}", format_plan(&plan)),
        ManualCleanup::Cancelled(_) => {
            println!();
            println!("❌ Cleanup cancelled");
        }
        ManualCleanup::Completed { result, .. } => {
            println!();
            print!("{}", format_cleanup_result(&result));
        }
    }
    println!();
    println!("{}", banner);

    Ok(())
}

/// Ask for confirmation; anything but `y`/`yes` (including EOF) declines
fn confirm_from(input: &mut impl BufRead) -> bool {
    print!("Proceed with deletion? (y/n): ");
    if let Err(e) = io::stdout().flush() {
        warn!("Could not flush prompt: {}", e);
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(e) => {
            warn!("Could not read confirmation: {}", e);
            false
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
