//! Logging infrastructure for the tandem CLI.
//!
//! Logs go to stderr so that `tandem plan` can keep stdout for the plan JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use tandem_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("assembling plan");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "tandem=debug,tandem_config=debug,tandem_cli=debug";
const QUIET_FILTER: &str = "tandem=error,tandem_config=error,tandem_cli=error";
const DEFAULT_FILTER: &str = "tandem=info,tandem_config=info,tandem_cli=info";

/// Initialize the tracing subscriber with the specified options.
///
/// Should be called once, before any logging occurs.
///
/// # Verbosity Levels
///
/// The logging level is determined in this order:
/// 1. `--verbose` flag: DEBUG for tandem crates
/// 2. `--quiet` flag: ERROR only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for tandem crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(select_filter(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
///
/// Uses `try_init` so a second call (e.g. from tests) is a no-op.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
