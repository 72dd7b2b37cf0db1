//! Init command implementation

use anyhow::Result;

use super::CommandContext;
use crate::app::runtime::initialize_run_storage;

/// Run the startup hook: automatic cleanup, then create the current run
pub async fn run_init_command(ctx: &CommandContext) -> Result<()> {
    let report = initialize_run_storage(&ctx.settings, ctx.current_run.clone()).await?;

    if let Some(summary) = &report.summary {
        println!("{}", summary);
    }
    if let Some(cleanup) = &report.cleanup {
        for failure in &cleanup.errors {
            println!("⚠️  Could not delete {}: {}", failure.run_id, failure.message);
        }
    }
    println!("{}", report.run_path.display());

    Ok(())
}
