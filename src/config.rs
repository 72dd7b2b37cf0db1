//! Cleanup settings
//!
//! Settings are layered, lowest priority first:
//!
//! 1. Hardcoded defaults
//! 2. A TOML file (`--config`, or `<config dir>/runkeeper/config.toml`)
//! 3. Environment variables (`CLEANUP_*`, `RUNKEEPER_*`)
//! 4. Command-line flags, applied by the caller
//!
//! Invalid values never abort startup: they fall back to the default (or,
//! for an unknown mode, disable cleanup) and log a warning.
//!
//! ```toml
//! enabled = true
//! retention_days = 7
//! retention_count = 3
//! retention_mode = "hybrid"
//! base_dir = "chroma_db_runs"
//! timeout = "30s"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::retention::{RetentionMode, RetentionPolicy};

pub const ENV_ENABLED: &str = "CLEANUP_ENABLED";
pub const ENV_RETENTION_DAYS: &str = "CLEANUP_RETENTION_DAYS";
pub const ENV_RETENTION_COUNT: &str = "CLEANUP_RETENTION_COUNT";
pub const ENV_RETENTION_MODE: &str = "CLEANUP_RETENTION_MODE";
pub const ENV_BASE_DIR: &str = "RUNKEEPER_BASE_DIR";
pub const ENV_TIMEOUT: &str = "RUNKEEPER_CLEANUP_TIMEOUT";

/// Default directory holding the run folders, relative to the working directory
pub const DEFAULT_BASE_DIR: &str = "chroma_db_runs";

/// Settings for run retention and cleanup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupSettings {
    /// Run cleanup automatically at startup
    pub enabled: bool,

    /// Keep runs at most this many days old
    pub retention_days: i64,

    /// Keep this many of the newest runs
    pub retention_count: i64,

    /// `days`, `count` or `hybrid`; kept as text so a bad value degrades
    /// instead of failing the whole file
    pub retention_mode: String,

    /// Directory containing the `run_*` folders
    pub base_dir: PathBuf,

    /// Watchdog for the startup cleanup pass
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: 7,
            retention_count: 3,
            retention_mode: RetentionMode::default().to_string(),
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            timeout: None,
        }
    }
}

impl CleanupSettings {
    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Default location of the settings file, if a config directory exists
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "runkeeper")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the given file (which must exist) or the default location
    /// (if present), then apply the process environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let settings = match config_path {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    debug!("Loading settings from {}", path.display());
                    Self::load_file(&path)?
                }
                None => Self::default(),
            },
        };

        Ok(settings.apply_env())
    }

    /// Override settings from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override settings from an arbitrary variable lookup
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ENABLED) {
            self.enabled = value.trim().eq_ignore_ascii_case("true");
        }
        if let Some(value) = lookup(ENV_RETENTION_DAYS) {
            self.retention_days = parse_int_or(ENV_RETENTION_DAYS, &value, self.retention_days);
        }
        if let Some(value) = lookup(ENV_RETENTION_COUNT) {
            self.retention_count = parse_int_or(ENV_RETENTION_COUNT, &value, self.retention_count);
        }
        if let Some(value) = lookup(ENV_RETENTION_MODE) {
            self.retention_mode = value;
        }
        if let Some(value) = lookup(ENV_BASE_DIR) {
            self.base_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            match humantime_serde::re::humantime::parse_duration(value.trim()) {
                Ok(timeout) => self.timeout = Some(timeout),
                Err(e) => warn!("Ignoring {}={:?}: {}", ENV_TIMEOUT, value, e),
            }
        }
        self
    }

    /// Parsed retention mode, if valid
    pub fn mode(&self) -> Result<RetentionMode> {
        self.retention_mode.parse()
    }

    /// The retention policy these settings describe
    ///
    /// An unknown mode yields a disabled policy.
    pub fn policy(&self) -> RetentionPolicy {
        match self.mode() {
            Ok(mode) => RetentionPolicy {
                enabled: self.enabled,
                mode,
                retention_days: self.retention_days,
                retention_count: self.retention_count,
            },
            Err(e) => {
                warn!("{}; cleanup disabled", e);
                RetentionPolicy {
                    retention_days: self.retention_days,
                    retention_count: self.retention_count,
                    ..RetentionPolicy::disabled()
                }
            }
        }
    }

    /// Policy for manually invoked cleanups
    ///
    /// The `enabled` switch only governs automatic startup cleanup, so it is
    /// ignored here; an unknown mode still disables deletion.
    pub fn manual_policy(&self) -> RetentionPolicy {
        let mut policy = self.policy();
        if self.mode().is_ok() {
            policy.enabled = true;
        }
        policy
    }
}

fn parse_int_or(key: &str, value: &str, fallback: i64) -> i64 {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("Ignoring {}={:?}: not an integer, using {}", key, value, fallback);
            fallback
        }
    }
}
