//! tandem CLI - assembles the `main` + `worker` build plan.
//!
//! The mode signal is read exactly once, here at the process boundary, and
//! handed to [`tandem_config`] as an explicit argument.
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions
//! - [`commands`] - `plan` and `check`
//! - [`error`] - CLI error type and miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines and plan summaries
//!
//! # Example
//!
//! ```rust
//! use tandem_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
