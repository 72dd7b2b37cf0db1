//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use anyhow::{Context, Result};
use chrono::Local;
use tracing::debug;

use crate::app::AppConfig;
use crate::cli::args::{Cli, Commands};
use crate::cli::commands::*;
use crate::config::CleanupSettings;
use crate::runs::RunId;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(cli: Cli, app: &AppConfig) -> Result<()> {
    let ctx = build_context(&cli, app)?;
    debug!(
        "Using run directory {} (current run {})",
        ctx.settings.base_dir.display(),
        ctx.current_run
    );

    match cli.command {
        Commands::Stats { json } => run_stats_command(&ctx, json),
        Commands::Clean {
            policy,
            dry_run,
            auto_accept,
        } => {
            let policy = policy.apply(ctx.settings.manual_policy());
            run_clean_command(&ctx, policy, false, dry_run, auto_accept)
        }
        Commands::Purge {
            dry_run,
            auto_accept,
        } => run_clean_command(&ctx, ctx.settings.manual_policy(), true, dry_run, auto_accept),
        Commands::Init => run_init_command(&ctx).await,
    }
}

/// Layer CLI flags over file and environment settings
fn build_context(cli: &Cli, app: &AppConfig) -> Result<CommandContext> {
    let mut settings =
        CleanupSettings::load(cli.config.as_deref()).context("Failed to load settings")?;

    if let Some(base_dir) = &cli.base_dir {
        settings.base_dir = base_dir.clone();
    }
    settings.base_dir = app.resolve(&settings.base_dir);

    let current_run = cli
        .current_run
        .clone()
        .unwrap_or_else(|| RunId::generate(Local::now().naive_local()));

    Ok(CommandContext {
        settings,
        current_run,
    })
}
