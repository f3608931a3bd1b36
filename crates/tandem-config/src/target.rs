//! Per-target specialization of the shared base.
//!
//! A target may only override the fields listed in [`OVERRIDABLE_FIELDS`].
//! Everything else comes verbatim from the [`BaseDefinition`] or from the
//! plugin assembler.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::base::BaseDefinition;
use crate::dev::DevServerConfig;
use crate::error::{PlanError, Result, Stage};
use crate::layout::ProjectLayout;
use crate::mode::BuildMode;
use crate::plugins::{PluginAssembler, PluginStep};
use crate::types::{
    EntryMap, Experiments, ModuleTransformRule, OutputLayout, ResolutionConfig,
    RuntimeEnvironment, TargetId,
};

/// Fields a target spec may set, as spelled in config files.
pub const OVERRIDABLE_FIELDS: [&str; 4] = ["entries", "runtimeEnvironment", "devServer", "experiments"];

/// Descriptor fields owned by the base, the mode or the plugin assembler.
pub const SHARED_FIELDS: [&str; 7] = [
    "name",
    "mode",
    "devtool",
    "output",
    "transformRules",
    "resolution",
    "plugins",
];

/// Everything needed to produce one output bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescriptor {
    pub name: String,
    pub mode: BuildMode,
    pub devtool: Option<String>,
    pub entries: EntryMap,
    pub runtime_environment: RuntimeEnvironment,
    pub output: OutputLayout,
    pub transform_rules: Arc<[ModuleTransformRule]>,
    pub resolution: Arc<ResolutionConfig>,
    pub plugins: Vec<PluginStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerConfig>,
    #[serde(default)]
    pub experiments: Experiments,
}

impl TargetDescriptor {
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|step| step.name() == name)
    }

    /// Chunk names, sorted.
    pub fn chunk_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

/// The target-specific half of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    pub name: String,
    pub entries: EntryMap,
    pub runtime_environment: RuntimeEnvironment,
    #[serde(default)]
    pub dev_server: Option<DevServerConfig>,
    #[serde(default)]
    pub experiments: Experiments,
}

impl TargetSpec {
    /// `web` and `background` chunks in the browser, fronted by the dev server.
    pub fn main(layout: &ProjectLayout) -> Self {
        Self {
            name: TargetId::Main.to_string(),
            entries: EntryMap::from([
                ("web".to_string(), layout.resolve(&layout.web_entry)),
                ("background".to_string(), layout.resolve(&layout.background_entry)),
            ]),
            runtime_environment: RuntimeEnvironment::Browser,
            dev_server: Some(DevServerConfig::cross_origin_isolated()),
            experiments: Experiments {
                async_web_assembly: true,
            },
        }
    }

    /// A single `worker` chunk in an isolated worker scope.
    pub fn worker(layout: &ProjectLayout) -> Self {
        Self {
            name: TargetId::Worker.to_string(),
            entries: EntryMap::from([(
                "worker".to_string(),
                layout.resolve(&layout.worker_entry),
            )]),
            runtime_environment: RuntimeEnvironment::IsolatedWorker,
            dev_server: None,
            experiments: Experiments::default(),
        }
    }

    pub fn for_target(target: TargetId, layout: &ProjectLayout) -> Self {
        match target {
            TargetId::Main => Self::main(layout),
            TargetId::Worker => Self::worker(layout),
        }
    }

    /// Apply overrides from a config file.
    ///
    /// Objects merge key by key; anything else replaces the current value.
    /// Relative entry paths are anchored at the layout root.
    ///
    /// # Errors
    ///
    /// `PlanError::Composition` when a key is outside the overridable set or the
    /// merged value no longer forms a valid spec.
    pub fn with_overrides(self, overrides: &Value, layout: &ProjectLayout) -> Result<Self> {
        if overrides.is_null() {
            return Ok(self);
        }
        let Value::Object(fields) = overrides else {
            return Err(PlanError::composition(
                &self.name,
                "<root>",
                "overrides must be a table of fields",
            ));
        };

        for key in fields.keys() {
            if OVERRIDABLE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            let hint = if SHARED_FIELDS.contains(&key.as_str()) {
                "shadows a shared field and cannot be overridden per target".to_string()
            } else {
                format!("is not overridable (allowed: {})", OVERRIDABLE_FIELDS.join(", "))
            };
            return Err(PlanError::composition(&self.name, key.as_str(), hint));
        }

        let name = self.name.clone();
        let mut merged = serde_json::to_value(&self)
            .map_err(|e| PlanError::composition(&name, "<spec>", e.to_string()))?;
        merge_values(&mut merged, overrides);
        let mut spec: Self = serde_json::from_value(merged).map_err(|e| {
            PlanError::composition(&name, "<spec>", format!("is invalid after overrides: {e}"))
        })?;

        for path in spec.entries.values_mut() {
            if path.is_relative() {
                *path = layout.resolve(&*path);
            }
        }
        Ok(spec)
    }
}

/// Merge `base` with a target spec and its assembled plugin steps.
///
/// # Errors
///
/// - `PlanError::UnknownTarget` if the spec names neither `main` nor `worker`
/// - `PlanError::Composition` if the spec breaks a per-target contract:
///   `main` runs in the browser behind a dev server, the worker runs in an
///   isolated worker scope without one, and the dev server keeps the
///   cross-origin isolation headers
pub fn compose(
    base: &BaseDefinition,
    mode: BuildMode,
    spec: TargetSpec,
    assembler: &PluginAssembler<'_>,
) -> Result<TargetDescriptor> {
    let target = TargetId::parse(&spec.name, Stage::TargetComposition)?;

    match target {
        TargetId::Main => {
            if spec.runtime_environment != RuntimeEnvironment::Browser {
                return Err(PlanError::composition(
                    &spec.name,
                    "runtimeEnvironment",
                    "must be browser for the main target",
                ));
            }
            if spec.dev_server.is_none() {
                return Err(PlanError::composition(
                    &spec.name,
                    "devServer",
                    "is required on the main target",
                ));
            }
        }
        TargetId::Worker => {
            if spec.runtime_environment != RuntimeEnvironment::IsolatedWorker {
                return Err(PlanError::composition(
                    &spec.name,
                    "runtimeEnvironment",
                    "must be isolatedWorker for the worker target",
                ));
            }
            if spec.dev_server.is_some() {
                return Err(PlanError::composition(
                    &spec.name,
                    "devServer",
                    "is only served through the main target",
                ));
            }
        }
    }

    if !spec.entries.keys().map(String::as_str).eq(target.chunks().iter().copied()) {
        return Err(PlanError::composition(
            &spec.name,
            "entries",
            format!("must name exactly the chunks {:?}", target.chunks()),
        ));
    }

    if let Some(dev) = &spec.dev_server {
        if !dev.is_cross_origin_isolated() {
            return Err(PlanError::composition(
                &spec.name,
                "devServer.headers",
                "must be exactly the cross-origin isolation headers",
            ));
        }
    }

    let plugins = assembler.assemble_for(mode, target);
    debug!(
        target_name = %spec.name,
        chunks = spec.entries.len(),
        plugins = plugins.len(),
        "composed target"
    );

    Ok(TargetDescriptor {
        name: spec.name,
        mode,
        devtool: mode.devtool().map(str::to_string),
        entries: spec.entries,
        runtime_environment: spec.runtime_environment,
        output: base.output.clone(),
        transform_rules: Arc::clone(&base.transform_rules),
        resolution: Arc::clone(&base.resolution),
        plugins,
        dev_server: spec.dev_server,
        experiments: spec.experiments,
    })
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
