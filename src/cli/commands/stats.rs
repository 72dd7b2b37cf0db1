//! Stats command implementation

use anyhow::{Context, Result};

use super::CommandContext;
use crate::presentation::format_storage_stats;

/// Print storage statistics for every run
pub fn run_stats_command(ctx: &CommandContext, json: bool) -> Result<()> {
    let stats = ctx
        .manager(ctx.settings.manual_policy())
        .get_storage_stats();

    if json {
        let output =
            serde_json::to_string_pretty(&stats).context("Failed to serialize storage stats")?;
        println!("{}", output);
    } else {
        println!("Run directory: {}", ctx.settings.base_dir.display());
        println!();
        print!("{}", format_storage_stats(&stats));
    }

    Ok(())
}
