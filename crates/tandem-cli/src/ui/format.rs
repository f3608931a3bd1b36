//! Formatting for durations and per-target plan summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;
use tandem_config::{BuildPlan, TargetDescriptor};

use super::{colors_enabled, is_quiet};

/// Format duration in human-readable format.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tandem_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// One-line, uncolored summary of a target.
///
/// `main  [background, web]  browser  plugins: html-shell, native-module  dev server 0.0.0.0:3000`
pub fn format_target_line(target: &TargetDescriptor) -> String {
    let plugins = if target.plugins.is_empty() {
        "none".to_string()
    } else {
        target
            .plugins
            .iter()
            .map(|step| step.name())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut line = format!(
        "{:<7}[{}]  {}  plugins: {}",
        target.name,
        target.chunk_names().join(", "),
        target.runtime_environment.engine_target(),
        plugins
    );
    if let Some(dev) = &target.dev_server {
        line.push_str(&format!("  dev server {}", dev.addr()));
    }
    line
}

/// Print the per-target summary table to stderr.
pub fn print_plan_summary(plan: &BuildPlan) {
    if is_quiet() {
        return;
    }
    let width = (Term::stderr().size().1 as usize).min(80);

    if colors_enabled() {
        eprintln!("\n{} ({})", "Build Plan".bold().underline(), plan.mode.cyan());
    } else {
        eprintln!("\nBuild Plan ({})", plan.mode);
    }
    eprintln!("{}", "─".repeat(width));

    for target in &plan.targets {
        let line = format_target_line(target);
        if colors_enabled() {
            eprintln!("  {} {}", "▸".blue(), line);
        } else {
            eprintln!("  ▸ {line}");
        }
    }

    eprintln!("{}", "─".repeat(width));
}
