//! Full build plan: the resolved mode and one descriptor per target.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::base::build_base;
use crate::error::{PlanError, Result, Stage};
use crate::layout::ProjectConfig;
use crate::mode::{resolve_mode, BuildMode};
use crate::plugins::PluginAssembler;
use crate::target::{compose, TargetDescriptor, TargetSpec};
use crate::types::TargetId;

/// Immutable input handed to the external build engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub mode: BuildMode,
    /// Always `[main, worker]`
    pub targets: Vec<TargetDescriptor>,
}

impl BuildPlan {
    /// Resolve the mode signal and assemble the plan.
    ///
    /// Fails on the first error; no partial plan is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_config::{BuildPlan, ProjectConfig};
    ///
    /// let plan = BuildPlan::assemble(Some("production"), &ProjectConfig::at("/app")).unwrap();
    /// let names: Vec<_> = plan.targets.iter().map(|t| t.name.as_str()).collect();
    /// assert_eq!(names, ["main", "worker"]);
    ///
    /// assert!(BuildPlan::assemble(Some("staging"), &ProjectConfig::default()).is_err());
    /// ```
    pub fn assemble(signal: Option<&str>, config: &ProjectConfig) -> Result<Self> {
        let mode = resolve_mode(signal)?;
        Self::for_mode(mode, config)
    }

    /// Assemble the plan for an already resolved mode.
    pub fn for_mode(mode: BuildMode, config: &ProjectConfig) -> Result<Self> {
        info!("use {mode} mode");

        for name in config.targets.keys() {
            TargetId::parse(name, Stage::TargetComposition)?;
        }

        let layout = &config.layout;
        let base = build_base(layout)?;
        let assembler = PluginAssembler::new(layout).with_toggles(config.plugins);

        let targets = TargetId::ALL
            .into_iter()
            .map(|target| {
                let mut spec = TargetSpec::for_target(target, layout);
                if let Some(overrides) = config.targets.get(target.as_str()) {
                    spec = spec.with_overrides(overrides, layout)?;
                }
                compose(&base, mode, spec, &assembler)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { mode, targets })
    }

    pub fn target(&self, name: &str) -> Option<&TargetDescriptor> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn main(&self) -> Option<&TargetDescriptor> {
        self.target(TargetId::Main.as_str())
    }

    pub fn worker(&self) -> Option<&TargetDescriptor> {
        self.target(TargetId::Worker.as_str())
    }

    /// The descriptor array as the engine consumes it.
    pub fn to_engine_value(&self) -> Result<Value> {
        serde_json::to_value(&self.targets).map_err(|e| PlanError::InvalidValue {
            field: "plan".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Serialize the descriptor array to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.targets)
        } else {
            serde_json::to_string(&self.targets)
        };
        rendered.map_err(|e| PlanError::InvalidValue {
            field: "plan".to_string(),
            hint: Some(e.to_string()),
        })
    }
}

/// Convenience wrapper around [`BuildPlan::assemble`].
pub fn assemble_plan(signal: Option<&str>, config: &ProjectConfig) -> Result<BuildPlan> {
    BuildPlan::assemble(signal, config)
}
