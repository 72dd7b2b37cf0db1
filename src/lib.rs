//! # Runkeeper
//!
//! Retention and cleanup for timestamped database snapshot runs.
//!
//! Each run of the host application writes into its own
//! `run_YYYYMMDD_HHMMSS` directory under a base directory. Runkeeper decides
//! which of those directories to keep (by age, by count, or both) and
//! deletes the rest, never touching the run currently in use.
//!
//! ## Usage
//!
//! ```bash
//! runkeeper stats [--json]
//! runkeeper clean [--dry-run] [--yes] [--mode days|count|hybrid] [--days N] [--count N]
//! runkeeper purge [--dry-run] [--yes]
//! runkeeper init
//! ```
//!
//! ## Modules
//!
//! - `runs` - Run identifiers, directory discovery and size accounting
//! - `retention` - Retention modes, policies and the keep/delete decision
//! - `cleanup` - Storage statistics, cleanup plans and deletion
//! - `config` - Layered cleanup settings (defaults, TOML, environment)
//! - `presentation` - Text rendering of stats, plans and results
//! - `app` - Logging, fatal error handling and the startup hook
//! - `cli` - Argument parsing and command dispatch
pub mod app;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod presentation;
pub mod retention;
pub mod runs;

pub use error::{Error, Result};
