use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sncap_core::VERSION;

/// sncap - Validate SNC-AP ledger exports against the budget coding rules
#[derive(Parser)]
#[command(name = "sncap")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the rules configuration file (TOML)
    #[arg(short, long, global = true, env = "SNCAP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging on stderr (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the `validate` command
#[derive(Args)]
pub struct ValidateArgs {
    /// Ledger exports to validate (.csv, .txt or .zip)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the annotated and summary CSV files (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Do not write CSV files, only report
    #[arg(long)]
    pub no_write: bool,

    /// Exit with a non-zero status when any record has violations
    #[arg(long)]
    pub fail_on_violations: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include every annotated record in JSON output
    #[arg(long, requires = "json")]
    pub records: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// ASCII-only symbols
    #[arg(long)]
    pub ascii: bool,
}

/// Arguments for the `rules` command
#[derive(Args)]
pub struct RulesArgs {
    /// Output as JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate ledger exports and write annotated copies
    Validate(ValidateArgs),

    /// Show the effective rule configuration
    Rules(RulesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
