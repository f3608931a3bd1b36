//! Error types for build-plan assembly and validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

/// Stage of plan assembly that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Loading `tandem.toml` / `package.json`
    Configuration,
    ModeResolution,
    BaseConstruction,
    PluginAssembly,
    TargetComposition,
    /// Post-assembly invariant and filesystem checks
    Validation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::ModeResolution => "mode resolution",
            Self::BaseConstruction => "base construction",
            Self::PluginAssembly => "plugin assembly",
            Self::TargetComposition => "target composition",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PlanError {
    // Mode signal errors
    #[error("invalid build mode {}: expected \"development\" or \"production\"", describe_signal(.value))]
    InvalidMode { value: Option<String> },

    // Target identity errors
    #[error("unknown target \"{name}\" during {stage}: expected \"main\" or \"worker\"")]
    UnknownTarget { name: String, stage: Stage },

    // Composition errors
    #[error("cannot compose target \"{target}\": field \"{field}\" {hint}")]
    Composition {
        target: String,
        field: String,
        hint: String,
    },

    #[error("invalid module pattern \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid alias \"{alias}\": {message}")]
    InvalidAlias { alias: String, message: String },

    // Schema validation errors (no filesystem checks)
    #[error("target \"{target}\" violates plan invariant: {message}")]
    InvariantViolation { target: String, message: String },

    // Filesystem validation errors (for CLI use)
    #[error("entry \"{chunk}\" of target \"{target}\" not found: {}", .path.display())]
    EntryNotFound {
        target: String,
        chunk: String,
        path: PathBuf,
    },

    #[error("HTML template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("entry \"{chunk}\" of target \"{target}\" is not handled by any transform rule: {}", .path.display())]
    UncoveredEntry {
        target: String,
        chunk: String,
        path: PathBuf,
    },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value in {field}{}", .hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlanError {
    /// The assembly stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidMode { .. } => Stage::ModeResolution,
            Self::UnknownTarget { stage, .. } => *stage,
            Self::Composition { .. } => Stage::TargetComposition,
            Self::InvalidPattern { .. } | Self::InvalidAlias { .. } => Stage::BaseConstruction,
            Self::InvariantViolation { .. }
            | Self::EntryNotFound { .. }
            | Self::TemplateNotFound { .. }
            | Self::UncoveredEntry { .. } => Stage::Validation,
            Self::NotFound | Self::InvalidValue { .. } | Self::Io(_) => Stage::Configuration,
        }
    }

    pub(crate) fn composition(
        target: impl Into<String>,
        field: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Composition {
            target: target.into(),
            field: field.into(),
            hint: hint.into(),
        }
    }

    pub(crate) fn invariant(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            target: target.into(),
            message: message.into(),
        }
    }
}

fn describe_signal(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("\"{v}\""),
        None => "<unset>".to_string(),
    }
}
