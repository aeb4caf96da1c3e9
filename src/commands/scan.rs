//! Scan command implementation

use anyhow::Result;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::formatter::{format_candidates, format_json, format_scan_summary, format_warnings};
use crate::scanner::ScanOptions;

use super::{choose_root, run_scan, EXIT_CANCELLED};

/// Build scan options from config, with command-line overrides applied.
pub fn scan_options(args: &ScanArgs, config: &Config) -> ScanOptions {
    let mut options = ScanOptions::from(&config.scanner);
    if let Some(limit) = args.max_results {
        options = options.with_max_results(limit);
    }
    if args.no_sizes {
        options = options.with_sizes(false);
    }
    options
}

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, quiet: bool) -> Result<()> {
    let root = choose_root(args.path.as_deref(), config);
    let options = scan_options(&args, config);

    tracing::info!(path = %root.display(), "Scanning directory");

    let result = run_scan(&root, options, !quiet && !args.json)?;

    if args.json {
        println!("{}", format_json(&result)?);
    } else {
        eprint!("{}", format_warnings(&result));
        if result.candidates.is_empty() {
            println!("No venv directories found under {}.", result.root.display());
        } else {
            print!("{}", format_candidates(&result));
            println!();
            println!("{}", format_scan_summary(&result));
        }
    }

    if result.cancelled {
        std::process::exit(EXIT_CANCELLED);
    }

    Ok(())
}
