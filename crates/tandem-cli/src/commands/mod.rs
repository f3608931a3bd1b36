//! Command implementations for the tandem CLI.
//!
//! - [`plan`] - Assemble the plan and emit it as JSON
//! - [`check`] - Assemble and validate against the source tree
//!
//! Each command provides an `execute` function that takes the parsed
//! arguments and returns a Result.

pub mod check;
pub mod plan;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use plan::execute as plan_execute;
