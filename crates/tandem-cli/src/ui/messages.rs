//! Status message functions for terminal output.

use owo_colors::OwoColorize;

use super::{colors_enabled, is_quiet};

/// Print a success message to stderr.
///
/// ```no_run
/// use tandem_cli::ui::success;
///
/// success("Plan written to dist/plan.json");
/// ```
pub fn success(message: &str) {
    if is_quiet() {
        return;
    }
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    if is_quiet() {
        return;
    }
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {message}");
    }
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    if is_quiet() {
        return;
    }
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {message}");
    }
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    } else {
        eprintln!("✗ {message}");
    }
}
