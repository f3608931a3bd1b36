//! File-based config discovery for CLI use
//!
//! Handles finding and loading the project config from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde_json::Value;
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::layout::ProjectConfig;

pub const CONFIG_FILE: &str = "tandem.toml";
pub const PACKAGE_JSON_FIELD: &str = "tandem";

/// File-based configuration discovery
///
/// Library users can build a [`ProjectConfig`] directly instead.
///
/// # Example
///
/// ```no_run
/// use tandem_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load_or_default().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `tandem.toml`
    /// 2. `package.json` (`tandem` field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file, anchored at the root.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ProjectConfig> {
        let path = self.find().ok_or(PlanError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config, falling back to the default layout when no file exists.
    pub fn load_or_default(&self) -> Result<ProjectConfig> {
        match self.load() {
            Err(PlanError::NotFound) => {
                debug!(root = %self.root.display(), "no project config, using default layout");
                Ok(ProjectConfig::default().anchored_at(&self.root))
            }
            other => other,
        }
    }

    fn load_from(&self, path: &Path) -> Result<ProjectConfig> {
        debug!(path = %path.display(), "loading project config");

        let figment = Figment::from(Serialized::defaults(ProjectConfig::default()));
        let figment = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            figment.merge(Serialized::defaults(self.package_json_field(path)?))
        } else {
            figment.merge(Toml::file(path))
        };

        let config: ProjectConfig = figment.extract().map_err(|e| PlanError::InvalidValue {
            field: path.display().to_string(),
            hint: Some(e.to_string()),
        })?;

        Ok(config.anchored_at(&self.root))
    }

    fn package_json_field(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;

        let parsed: Value = serde_json::from_str(&content).map_err(|e| PlanError::InvalidValue {
            field: "package.json".to_string(),
            hint: Some(format!("Invalid JSON: {e}")),
        })?;

        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(Value::Null) | None => Err(PlanError::InvalidValue {
                field: PACKAGE_JSON_FIELD.to_string(),
                hint: Some("Add a 'tandem' field to your package.json".to_string()),
            }),
            Some(value) => Ok(value.clone()),
        }
    }
}

/// Discover and load config from the current directory (convenience function)
pub fn discover() -> Result<ProjectConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_or_default()
}
