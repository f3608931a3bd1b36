//! Pluggable build-plan validation strategies
//!
//! Separates invariant checks (pure, no I/O) from filesystem checks (for CLI use).

use std::collections::HashSet;

use crate::base::{UI_ALIAS, WASM_ALIAS};
use crate::error::{PlanError, Result};
use crate::plan::BuildPlan;
use crate::plugins::PluginStep;
use crate::types::{RuntimeEnvironment, TargetId};

/// Trait for pluggable plan validation strategies
pub trait PlanValidator {
    fn validate(&self, plan: &BuildPlan) -> Result<()>;
}

/// Structural invariants of a plan (no filesystem checks)
///
/// # Example
///
/// ```
/// use tandem_config::{BuildMode, BuildPlan, InvariantValidator, PlanValidator, ProjectConfig};
///
/// let plan = BuildPlan::for_mode(BuildMode::Development, &ProjectConfig::at("/app")).unwrap();
/// InvariantValidator.validate(&plan).unwrap();
/// ```
pub struct InvariantValidator;

impl PlanValidator for InvariantValidator {
    fn validate(&self, plan: &BuildPlan) -> Result<()> {
        let mut seen = HashSet::new();
        for target in &plan.targets {
            let name = target.name.as_str();

            if !seen.insert(name) {
                return Err(PlanError::invariant(name, "target name is not unique"));
            }

            if target.mode != plan.mode {
                return Err(PlanError::invariant(
                    name,
                    format!("mode {} differs from plan mode {}", target.mode, plan.mode),
                ));
            }

            if target.entries.keys().any(|chunk| chunk.trim().is_empty()) {
                return Err(PlanError::invariant(name, "chunk names cannot be empty"));
            }

            let alias = &target.resolution.alias;
            let ui = alias.get(UI_ALIAS);
            let wasm = alias.get(WASM_ALIAS);
            match (ui, wasm) {
                (Some(ui), Some(wasm)) if alias.len() == 2 => {
                    if ui.as_os_str().is_empty() || wasm.as_os_str().is_empty() {
                        return Err(PlanError::invariant(name, "alias paths cannot be empty"));
                    }
                    if ui == wasm {
                        return Err(PlanError::invariant(
                            name,
                            format!("aliases \"{UI_ALIAS}\" and \"{WASM_ALIAS}\" point at the same directory"),
                        ));
                    }
                }
                _ => {
                    return Err(PlanError::invariant(
                        name,
                        format!("alias map must hold exactly \"{UI_ALIAS}\" and \"{WASM_ALIAS}\""),
                    ));
                }
            }

            if name == TargetId::Main.as_str() {
                if target.runtime_environment != RuntimeEnvironment::Browser {
                    return Err(PlanError::invariant(name, "main target must run in the browser"));
                }
                if target.dev_server.is_none() {
                    return Err(PlanError::invariant(name, "main target has no dev server"));
                }
            }

            if let Some(dev) = &target.dev_server {
                if target.runtime_environment != RuntimeEnvironment::Browser {
                    return Err(PlanError::invariant(
                        name,
                        "dev server configured on a non-browser target",
                    ));
                }
                if !dev.is_cross_origin_isolated() {
                    return Err(PlanError::invariant(
                        name,
                        "dev server headers differ from the cross-origin isolation pair",
                    ));
                }
            }

            if target.runtime_environment == RuntimeEnvironment::IsolatedWorker
                && !target.plugins.is_empty()
            {
                return Err(PlanError::invariant(
                    name,
                    "isolated worker targets take no plugin steps",
                ));
            }

            let html_pos = target
                .plugins
                .iter()
                .position(|step| matches!(step, PluginStep::HtmlShell(_)));
            let native_pos = target
                .plugins
                .iter()
                .position(|step| matches!(step, PluginStep::NativeModule(_)));
            if let (Some(html), Some(native)) = (html_pos, native_pos) {
                if native < html {
                    return Err(PlanError::invariant(
                        name,
                        "native-module step precedes the HTML shell",
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs [`InvariantValidator`], then checks that entries and the HTML
/// template exist and that every entry is claimed by a transform rule.
pub struct FsValidator;

impl PlanValidator for FsValidator {
    fn validate(&self, plan: &BuildPlan) -> Result<()> {
        InvariantValidator.validate(plan)?;

        for target in &plan.targets {
            for (chunk, path) in &target.entries {
                if !path.exists() {
                    return Err(PlanError::EntryNotFound {
                        target: target.name.clone(),
                        chunk: chunk.clone(),
                        path: path.clone(),
                    });
                }

                let mut claimed = false;
                for rule in target.transform_rules.iter() {
                    if rule.matches(path)? {
                        claimed = true;
                        break;
                    }
                }
                if !claimed {
                    return Err(PlanError::UncoveredEntry {
                        target: target.name.clone(),
                        chunk: chunk.clone(),
                        path: path.clone(),
                    });
                }
            }

            for step in &target.plugins {
                if let PluginStep::HtmlShell(html) = step {
                    if !html.template.exists() {
                        return Err(PlanError::TemplateNotFound {
                            path: html.template.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Convenience function for invariant-only validation
pub fn validate_invariants(plan: &BuildPlan) -> Result<()> {
    InvariantValidator.validate(plan)
}

/// Convenience function for filesystem validation
pub fn validate_fs(plan: &BuildPlan) -> Result<()> {
    FsValidator.validate(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ProjectConfig;
    use crate::mode::BuildMode;
    use crate::plugins::BundleAnalyzerOptions;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn plan(mode: BuildMode) -> BuildPlan {
        BuildPlan::for_mode(mode, &ProjectConfig::at("/app")).unwrap()
    }

    #[test]
    fn assembled_plans_pass() {
        assert!(validate_invariants(&plan(BuildMode::Development)).is_ok());
        assert!(validate_invariants(&plan(BuildMode::Production)).is_ok());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut plan = plan(BuildMode::Production);
        plan.targets[1].name = "main".into();
        let err = validate_invariants(&plan).unwrap_err();
        assert!(matches!(err, PlanError::InvariantViolation { ref message, .. } if message.contains("unique")));
    }

    #[test]
    fn rejects_colliding_alias_paths() {
        let mut plan = plan(BuildMode::Production);
        let mut resolution = (*plan.targets[0].resolution).clone();
        resolution.alias.insert(WASM_ALIAS.into(), PathBuf::from("/app/web"));
        plan.targets[0].resolution = Arc::new(resolution);
        let err = validate_invariants(&plan).unwrap_err();
        assert!(matches!(err, PlanError::InvariantViolation { ref message, .. } if message.contains("same directory")));
    }

    #[test]
    fn rejects_main_without_dev_server() {
        let mut plan = plan(BuildMode::Production);
        plan.targets[0].dev_server = None;
        let err = validate_invariants(&plan).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvariantViolation { ref target, ref message } if target == "main" && message.contains("no dev server")
        ));
    }

    #[test]
    fn rejects_extra_alias() {
        let mut plan = plan(BuildMode::Production);
        let mut resolution = (*plan.targets[0].resolution).clone();
        resolution.alias.insert("~".into(), PathBuf::from("/app/lib"));
        plan.targets[0].resolution = Arc::new(resolution);
        assert!(validate_invariants(&plan).is_err());
    }

    #[test]
    fn rejects_plugins_on_worker() {
        let mut plan = plan(BuildMode::Production);
        plan.targets[1]
            .plugins
            .push(PluginStep::BundleAnalyzer(BundleAnalyzerOptions::default()));
        let err = validate_invariants(&plan).unwrap_err();
        assert!(matches!(err, PlanError::InvariantViolation { ref target, .. } if target == "worker"));
    }

    #[test]
    fn rejects_native_module_before_html() {
        let mut plan = plan(BuildMode::Development);
        plan.targets[0].plugins.reverse();
        assert!(validate_invariants(&plan).is_err());
    }

    #[test]
    fn rejects_tampered_headers() {
        let mut plan = plan(BuildMode::Development);
        if let Some(dev) = plan.targets[0].dev_server.as_mut() {
            dev.headers.shift_remove("Cross-Origin-Opener-Policy");
        }
        assert!(validate_invariants(&plan).is_err());
    }

    #[test]
    fn fs_validator_reports_missing_entry() {
        let err = validate_fs(&plan(BuildMode::Production)).unwrap_err();
        assert!(matches!(err, PlanError::EntryNotFound { .. }));
    }
}
