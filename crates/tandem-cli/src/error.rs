//! Error handling for the tandem CLI.
//!
//! Library failures arrive as [`PlanError`] and keep their assembly stage; the
//! CLI adds argument, I/O and serialization failures on top.

mod miette;

pub use self::miette::cli_error_to_miette;

use tandem_config::{PlanError, Stage};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Plan assembly or validation failed
    #[error("{} failed: {}", .0.stage(), .0)]
    Plan(#[from] PlanError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

impl CliError {
    /// Assembly stage for plan errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Plan(err) => Some(err.stage()),
            _ => None,
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Prefix the error with a message.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use tandem_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// std::fs::write("/read-only/plan.json", "[]").context("Failed to write plan")?;
    /// # Ok(())
    /// # }
    /// ```
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_message_names_stage() {
        let err: CliError = PlanError::InvalidMode {
            value: Some("staging".into()),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.starts_with("mode resolution failed"));
        assert!(msg.contains("\"staging\""));
        assert_eq!(err.stage(), Some(Stage::ModeResolution));
    }

    #[test]
    fn io_error_has_no_stage() {
        let err: CliError = std::io::Error::other("disk full").into();
        assert!(err.stage().is_none());
    }

    #[test]
    fn context_prefixes_message() {
        let result: std::result::Result<(), PlanError> = Err(PlanError::NotFound);
        let err = result.context("Failed to load tandem.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load tandem.toml: configuration failed: config not found"
        );
    }
}
