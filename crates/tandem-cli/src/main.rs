//! tandem CLI - build-plan assembly for a browser UI and its worker.
//!
//! Handles command-line argument parsing, logging initialization, and command
//! dispatch.

use clap::Parser;
use miette::Result;
use tandem_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);
    ui::set_quiet(args.quiet);

    let result = match args.command {
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args),
        cli::Command::Check(check_args) => commands::check_execute(check_args),
    };

    // Convert CLI errors to miette diagnostics
    result.map_err(error::cli_error_to_miette)
}
