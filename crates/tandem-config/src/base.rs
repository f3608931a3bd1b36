//! The configuration fragment shared by every target.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::layout::ProjectLayout;
use crate::types::{AliasMap, ModuleTransformRule, OutputLayout, ResolutionConfig};

/// Extension search order for extension-less imports.
pub const EXTENSION_ORDER: [&str; 5] = [".tsx", ".ts", ".less", ".js", ".jsx"];

/// Alias for the UI source root.
pub const UI_ALIAS: &str = "@";
/// Alias for the compiled native-module output.
pub const WASM_ALIAS: &str = "@wasm";

/// Shared, read-only input to every target.
///
/// Rules and resolution are reference counted so each descriptor holds the
/// same allocation rather than a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDefinition {
    pub output: OutputLayout,
    pub transform_rules: Arc<[ModuleTransformRule]>,
    pub resolution: Arc<ResolutionConfig>,
}

/// Build the shared fragment. It never depends on the build mode.
///
/// # Errors
///
/// `PlanError::InvalidPattern` if a rule pattern fails to compile, and
/// `PlanError::InvalidAlias` if an alias path is empty or both aliases
/// resolve to the same directory.
pub fn build_base(layout: &ProjectLayout) -> Result<BaseDefinition> {
    let rules = [style_rule(), typed_script_rule()];
    for rule in &rules {
        rule.check_patterns()?;
    }

    let ui_root = layout.ui_root();
    let wasm_root = layout.wasm_root();
    for (name, path) in [(UI_ALIAS, &ui_root), (WASM_ALIAS, &wasm_root)] {
        if path.as_os_str().is_empty() {
            return Err(PlanError::InvalidAlias {
                alias: name.to_string(),
                message: "path is empty".to_string(),
            });
        }
    }
    if ui_root == wasm_root {
        return Err(PlanError::InvalidAlias {
            alias: WASM_ALIAS.to_string(),
            message: format!(
                "resolves to {}, the same directory as \"{UI_ALIAS}\"",
                wasm_root.display()
            ),
        });
    }

    let mut alias = AliasMap::with_capacity(2);
    alias.insert(UI_ALIAS.to_string(), ui_root);
    alias.insert(WASM_ALIAS.to_string(), wasm_root);

    Ok(BaseDefinition {
        output: OutputLayout::new(layout.output_root()),
        transform_rules: Arc::from(rules),
        resolution: Arc::new(ResolutionConfig {
            extensions: EXTENSION_ORDER.iter().map(|ext| ext.to_string()).collect(),
            alias,
        }),
    })
}

/// `.less` and `.css`, through the style processor chain.
pub fn style_rule() -> ModuleTransformRule {
    ModuleTransformRule::new(
        r"(?i)\.(less|css)$",
        ["style-loader", "css-loader", "less-loader"],
    )
}

/// `.ts` and `.tsx`, compiled to plain script; vendored sources are skipped.
pub fn typed_script_rule() -> ModuleTransformRule {
    ModuleTransformRule::new(r"\.tsx?$", ["ts-loader"]).with_exclude("node_modules")
}
