//! Command implementation modules
//!
//! This module contains the implementation of each CLI command.
//! Each command is implemented as a separate module for better organization.

pub mod clean;
pub mod init;
pub mod stats;

use crate::cleanup::RunCleanupManager;
use crate::config::CleanupSettings;
use crate::retention::RetentionPolicy;
use crate::runs::RunId;

// Re-export command execution functions
pub use clean::run_clean_command;
pub use init::run_init_command;
pub use stats::run_stats_command;

/// Resolved settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Settings with an absolute base directory
    pub settings: CleanupSettings,
    pub current_run: RunId,
}

impl CommandContext {
    pub fn manager(&self, policy: RetentionPolicy) -> RunCleanupManager {
        RunCleanupManager::new(
            self.settings.base_dir.clone(),
            self.current_run.clone(),
            policy,
        )
    }
}
