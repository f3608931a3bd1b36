//! Command-line interface definition for tandem.
//!
//! # Command Structure
//!
//! - `tandem plan` - Assemble the build plan and print it as JSON
//! - `tandem check` - Assemble the plan and validate it against the source tree

mod commands;

use clap::Parser;

pub use commands::{CheckArgs, Command, PlanArgs, TargetArg};

/// tandem - build plans for a browser UI bundle and its isolated worker
#[derive(Parser, Debug)]
#[command(
    name = "tandem",
    version,
    about = "Assemble the main/worker build plan",
    long_about = "tandem derives two build targets from a single build mode: the browser UI\n\
                  bundle (`main`) and the isolated worker bundle (`worker`). The resulting\n\
                  plan is handed to the bundling engine as JSON."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Outputs plain text without ANSI color codes. Useful for logging to
    /// files or systems that don't support colored terminal output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
