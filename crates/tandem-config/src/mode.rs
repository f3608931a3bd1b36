//! Build mode resolution.
//!
//! The mode is read once from an external signal and then passed by value to
//! every downstream step. Nothing in this crate reads the environment itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Environment variable the CLI reads the mode signal from.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

/// Development/production axis of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Source-map style handed to the engine (`devtool`).
    ///
    /// Production builds emit no source maps.
    pub fn devtool(&self) -> Option<&'static str> {
        match self {
            Self::Development => Some("eval-source-map"),
            Self::Production => None,
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(PlanError::InvalidMode {
                value: Some(other.to_string()),
            }),
        }
    }
}

/// Resolve the raw mode signal.
///
/// An absent signal is an error: there is no implicit development default.
///
/// # Example
///
/// ```
/// use tandem_config::{resolve_mode, BuildMode};
///
/// assert_eq!(resolve_mode(Some("production")).unwrap(), BuildMode::Production);
/// assert!(resolve_mode(Some("staging")).is_err());
/// assert!(resolve_mode(None).is_err());
/// ```
pub fn resolve_mode(signal: Option<&str>) -> Result<BuildMode> {
    match signal {
        Some(raw) => raw.parse(),
        None => Err(PlanError::InvalidMode { value: None }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_both_literals() {
        assert_eq!(
            resolve_mode(Some("development")).unwrap(),
            BuildMode::Development
        );
        assert_eq!(
            resolve_mode(Some("production")).unwrap(),
            BuildMode::Production
        );
    }

    #[test]
    fn rejects_unrecognized_signals() {
        for raw in ["", "staging", "Production", " development", "prod"] {
            match resolve_mode(Some(raw)) {
                Err(PlanError::InvalidMode { value }) => assert_eq!(value.as_deref(), Some(raw)),
                other => panic!("expected InvalidMode for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_missing_signal() {
        assert!(matches!(
            resolve_mode(None),
            Err(PlanError::InvalidMode { value: None })
        ));
    }

    #[test]
    fn devtool_follows_mode() {
        assert_eq!(BuildMode::Development.devtool(), Some("eval-source-map"));
        assert_eq!(BuildMode::Production.devtool(), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(BuildMode::Production).unwrap(),
            serde_json::json!("production")
        );
    }
}
