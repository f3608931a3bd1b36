//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use miette::Report;
use tandem_config::{PlanError, MODE_ENV_VAR};

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Plan(e) => plan_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert PlanError to miette Report, with a hint where one helps.
pub fn plan_error_to_miette(err: PlanError) -> Report {
    let stage = err.stage();
    let code = format!("tandem::{}", stage.as_str().replace(' ', "_"));
    match hint(&err) {
        Some(help) => miette::miette!(code = code, help = help, "{stage} failed: {err}"),
        None => miette::miette!(code = code, "{stage} failed: {err}"),
    }
}

fn hint(err: &PlanError) -> Option<String> {
    match err {
        PlanError::InvalidMode { .. } => Some(format!(
            "pass --mode development|production or set {MODE_ENV_VAR}"
        )),
        PlanError::UnknownTarget { .. } => {
            Some("only [targets.main] and [targets.worker] can be configured".to_string())
        }
        PlanError::Composition { .. } => Some(
            "targets may only override entries, runtimeEnvironment, devServer and experiments"
                .to_string(),
        ),
        PlanError::EntryNotFound { .. } | PlanError::TemplateNotFound { .. } => {
            Some("check the [layout] table of tandem.toml".to_string())
        }
        PlanError::UncoveredEntry { .. } => {
            Some("entries must be .ts/.tsx sources outside node_modules".to_string())
        }
        _ => None,
    }
}
