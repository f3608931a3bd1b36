//! Check command implementation.
//!
//! Validates the assembled plan without handing it to the engine.

use std::time::Instant;

use tandem_config::{FsValidator, InvariantValidator, PlanValidator};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Resolve the mode and load tandem.toml
/// 2. Assemble the plan
/// 3. Check structural invariants
/// 4. Check entries, template and transform coverage on disk (unless `--skip-fs`)
///
/// # Errors
///
/// Returns the first failure; the message names the stage it came from.
pub fn execute(args: CheckArgs) -> Result<()> {
    let started = Instant::now();
    ui::info("Checking build plan...");

    let root = utils::project_root(args.cwd.as_deref())?;
    let (config, plan) = utils::assemble(&root, args.mode)?;

    if config.plugins.bundle_analyzer && !plan.mode.is_production() {
        ui::warning("bundle analyzer only runs in production builds");
    }

    let result = if args.skip_fs {
        InvariantValidator.validate(&plan)
    } else {
        FsValidator.validate(&plan)
    };
    if let Err(err) = result {
        ui::error(&format!("{} check failed", err.stage()));
        return Err(err.into());
    }

    ui::print_plan_summary(&plan);
    ui::success(&format!(
        "{} targets valid in {}",
        plan.targets.len(),
        ui::format_duration(started.elapsed())
    ));
    Ok(())
}
