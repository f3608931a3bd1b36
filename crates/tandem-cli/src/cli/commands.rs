use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use tandem_config::TargetId;

/// Available tandem subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble the build plan and print it
    ///
    /// Resolves the build mode, loads tandem.toml (or the `tandem` field of
    /// package.json) and prints the `[main, worker]` descriptors as JSON.
    Plan(PlanArgs),

    /// Validate the plan against the source tree
    ///
    /// Assembles the plan, then checks that every entry and the HTML
    /// template exist and that each entry is handled by a transform rule.
    Check(CheckArgs),
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Build mode: development or production
    ///
    /// Falls back to the NODE_ENV environment variable. Any other value,
    /// or neither being set, is an error.
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Write the plan to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Only print one target's descriptor
    #[arg(short, long, value_enum, value_name = "TARGET")]
    pub target: Option<TargetArg>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Build mode: development or production
    ///
    /// Falls back to the NODE_ENV environment variable.
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Only check structural invariants, not the filesystem
    #[arg(long)]
    pub skip_fs: bool,
}

/// Target selector for `--target`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetArg {
    /// Browser UI bundle
    Main,
    /// Isolated worker bundle
    Worker,
}

impl From<TargetArg> for TargetId {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Main => TargetId::Main,
            TargetArg::Worker => TargetId::Worker,
        }
    }
}
