use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// venv-sweeper - find and remove Python `venv` directories
#[derive(Parser, Debug)]
#[command(name = "venv-sweeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH", env = "VENV_SWEEPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List venv directories below a path
    Scan(ScanArgs),

    /// Delete specific venv directories
    Delete(DeleteArgs),

    /// Scan, pick directories interactively, and delete them
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory to scan [default: config default_root or .]
    pub path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Stop after N results
    #[arg(long, value_name = "N", value_parser = at_least_one())]
    pub max_results: Option<usize>,

    /// Skip measuring directory sizes
    #[arg(long)]
    pub no_sizes: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// venv directories to delete
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Refuse paths outside this directory
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Show what would be deleted without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Parallel delete jobs
    #[arg(short, long, value_name = "N", value_parser = at_least_one())]
    pub jobs: Option<usize>,

    /// Output outcomes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Root directory to scan [default: config default_root or .]
    pub path: Option<PathBuf>,

    /// Select every result instead of prompting for a selection
    #[arg(short, long)]
    pub all: bool,

    /// Skip the final confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show what would be deleted without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Parallel delete jobs
    #[arg(short, long, value_name = "N", value_parser = at_least_one())]
    pub jobs: Option<usize>,
}
