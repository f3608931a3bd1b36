//! Static source-tree layout and the project config file that can adjust it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlanError, Result};
use crate::plugins::PluginToggles;

/// Where the project keeps its sources, native crate and outputs.
///
/// Every path except `root` is relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// UI sources (`@` alias)
    #[serde(default = "default_ui_dir")]
    pub ui_dir: PathBuf,

    /// wasm-pack output (`@wasm` alias)
    #[serde(default = "default_wasm_out_dir")]
    pub wasm_out_dir: PathBuf,

    /// Crate compiled into the native module
    #[serde(default = "default_crate_dir")]
    pub crate_dir: PathBuf,

    /// Watched by the native-module step in development
    #[serde(default = "default_native_src_dir")]
    pub native_src_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// HTML shell template
    #[serde(default = "default_template")]
    pub template: PathBuf,

    #[serde(default = "default_web_entry")]
    pub web_entry: PathBuf,

    #[serde(default = "default_background_entry")]
    pub background_entry: PathBuf,

    #[serde(default = "default_worker_entry")]
    pub worker_entry: PathBuf,
}

impl ProjectLayout {
    /// Default layout rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Join a layout-relative path onto the root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative == Path::new(".") {
            return self.root.clone();
        }
        self.root.join(relative)
    }

    pub fn ui_root(&self) -> PathBuf {
        self.resolve(&self.ui_dir)
    }

    pub fn wasm_root(&self) -> PathBuf {
        self.resolve(&self.wasm_out_dir)
    }

    pub fn crate_root(&self) -> PathBuf {
        self.resolve(&self.crate_dir)
    }

    pub fn native_src_root(&self) -> PathBuf {
        self.resolve(&self.native_src_dir)
    }

    pub fn output_root(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.template)
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            root: default_root(),
            ui_dir: default_ui_dir(),
            wasm_out_dir: default_wasm_out_dir(),
            crate_dir: default_crate_dir(),
            native_src_dir: default_native_src_dir(),
            output_dir: default_output_dir(),
            template: default_template(),
            web_entry: default_web_entry(),
            background_entry: default_background_entry(),
            worker_entry: default_worker_entry(),
        }
    }
}

/// Contents of `tandem.toml` (or the `tandem` field of `package.json`).
///
/// The build mode is deliberately absent: it only ever arrives through the
/// mode signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub layout: ProjectLayout,

    #[serde(default)]
    pub plugins: PluginToggles,

    /// Per-target overrides, keyed by target name
    #[serde(default)]
    pub targets: BTreeMap<String, Value>,
}

impl ProjectConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_config::ProjectConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let config = ProjectConfig::from_value(json!({
    ///     "layout": { "ui_dir": "client" }
    /// }))
    /// .unwrap();
    /// assert_eq!(config.layout.ui_dir, PathBuf::from("client"));
    /// assert_eq!(config.layout.wasm_out_dir, PathBuf::from("pkg"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| PlanError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| PlanError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Default config rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ProjectLayout::at(root),
            ..Self::default()
        }
    }

    /// Anchor a relative layout root at `dir`.
    pub fn anchored_at(mut self, dir: &Path) -> Self {
        if self.layout.root.is_relative() {
            self.layout.root = if self.layout.root == Path::new(".") {
                dir.to_path_buf()
            } else {
                dir.join(&self.layout.root)
            };
        }
        self
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_ui_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_wasm_out_dir() -> PathBuf {
    PathBuf::from("pkg")
}

fn default_crate_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_native_src_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_template() -> PathBuf {
    PathBuf::from("web/web.html")
}

fn default_web_entry() -> PathBuf {
    PathBuf::from("web/web.tsx")
}

fn default_background_entry() -> PathBuf {
    PathBuf::from("web/background.ts")
}

fn default_worker_entry() -> PathBuf {
    PathBuf::from("web/worker.ts")
}
