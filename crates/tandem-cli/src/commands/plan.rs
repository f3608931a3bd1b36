//! Plan command implementation.
//!
//! Assembles the build plan and hands it over as JSON.

use std::fs;

use tandem_config::{validate_invariants, BuildPlan, TargetId};
use tracing::info;

use crate::cli::PlanArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Execute the plan command.
///
/// Nothing is written when assembly fails: the JSON is rendered only after
/// the whole plan has been built and its invariants checked.
///
/// # Errors
///
/// Returns `CliError::Plan` for an invalid mode signal, a bad config file or a
/// composition failure, and I/O errors when writing `--out`.
pub fn execute(args: PlanArgs) -> Result<()> {
    let root = utils::project_root(args.cwd.as_deref())?;
    let (_, plan) = utils::assemble(&root, args.mode)?;
    validate_invariants(&plan)?;

    let rendered = render(&plan, args.target.map(TargetId::from), !args.compact)?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&out, format!("{rendered}\n"))
                .context(format!("Failed to write {}", out.display()))?;
            info!(path = %out.display(), "plan written");
            ui::success(&format!("{} plan written to {}", plan.mode, out.display()));
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Render the whole descriptor array, or a single descriptor.
pub fn render(plan: &BuildPlan, target: Option<TargetId>, pretty: bool) -> Result<String> {
    let Some(target) = target else {
        return Ok(plan.to_json(pretty)?);
    };

    let descriptor = plan.target(target.as_str()).ok_or_else(|| {
        CliError::InvalidArgument(format!("target \"{target}\" is not part of the plan"))
    })?;
    let rendered = if pretty {
        serde_json::to_string_pretty(descriptor)?
    } else {
        serde_json::to_string(descriptor)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tandem_config::{BuildMode, ProjectConfig};

    fn plan() -> BuildPlan {
        BuildPlan::for_mode(BuildMode::Development, &ProjectConfig::at("/app")).unwrap()
    }

    #[test]
    fn renders_array_of_two_descriptors() {
        let value: Value = serde_json::from_str(&render(&plan(), None, true).unwrap()).unwrap();
        let names: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["main", "worker"]);
    }

    #[test]
    fn renders_single_target() {
        let rendered = render(&plan(), Some(TargetId::Worker), false).unwrap();
        assert!(!rendered.contains('\n'));
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["name"], "worker");
        assert_eq!(value["runtimeEnvironment"], "isolatedWorker");
        assert!(value.get("devServer").is_none());
    }
}
