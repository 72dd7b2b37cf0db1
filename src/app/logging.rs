//! Logging configuration and initialization
//!
//! Logs go to stderr so that command output on stdout (tables, JSON) stays
//! machine-readable. `RUST_LOG`, when set, replaces the verbosity-derived
//! filter.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use crate::app::config::AppConfig;

/// Build the log filter for the given configuration
fn log_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()))
}

/// Initialize tracing for the runkeeper binary
pub fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2)
        .with_thread_ids(config.verbose >= 3)
        .with_line_number(config.verbose >= 3)
        .init();

    debug!(
        "runkeeper {} started with verbosity level {}",
        env!("CARGO_PKG_VERSION"),
        config.verbose
    );
    trace!("Working directory: {}", config.working_dir.display());
}
