//! sncap CLI - validate SNC-AP ledger exports
//!
//! Reads general-ledger exports (CSV/TXT or zipped), checks every record
//! against the budget coding rules and writes an annotated copy plus a
//! summary of the messages found.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod output;
mod ui;

use clap::Parser;

use crate::app::{init_tracing, report_error};
use crate::cli::{Cli, Commands};

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Validate(args) => commands::handle_validate(cli, args),
        Commands::Rules(args) => commands::handle_rules(cli, args),
        Commands::Completions(args) => commands::handle_completions(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(&cli) {
        std::process::exit(report_error(&err));
    }
}
