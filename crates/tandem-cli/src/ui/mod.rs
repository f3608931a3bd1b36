//! Terminal UI: status lines and plan summaries on stderr.
//!
//! stdout is reserved for the plan JSON.
//!
//! # Examples
//!
//! ```no_run
//! use tandem_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Plan is valid");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

mod format;
mod messages;

pub use format::{format_duration, format_target_line, print_plan_summary};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status lines are colored. `--no-color` always wins.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Under `--quiet` only error lines reach stderr.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub(crate) fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}
