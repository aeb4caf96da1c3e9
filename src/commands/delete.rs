//! Delete command implementation.

use anyhow::Result;
use serde::Serialize;

use crate::cleaner::{DeleteOptions, DeletionOutcome, DeletionSummary};
use crate::cli::DeleteArgs;
use crate::config::Config;
use crate::formatter::{format_json, format_outcomes};
use crate::scanner::resolve_root;

use super::{confirm, run_delete, EXIT_CANCELLED, EXIT_PARTIAL_FAILURE};

#[derive(Debug, Serialize)]
struct DeleteReport<'a> {
    dry_run: bool,
    outcomes: &'a [DeletionOutcome],
    summary: DeletionSummary,
}

/// Run the delete command.
pub fn run(args: DeleteArgs, config: &Config, quiet: bool) -> Result<()> {
    let root = args.root.as_deref().map(resolve_root).transpose()?;

    if !args.yes && !args.dry_run {
        println!("The following directories will be permanently deleted:");
        for path in &args.paths {
            println!("  {}", path.display());
        }
        if !confirm(&format!(
            "\nAre you sure you want to permanently delete {} path{}?",
            args.paths.len(),
            if args.paths.len() == 1 { "" } else { "s" }
        ))? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let options = DeleteOptions {
        dry_run: args.dry_run,
        jobs: args.jobs.unwrap_or(config.cleaner.parallel_jobs).max(1),
        root,
    };
    let dry_run = options.dry_run;

    let outcomes = run_delete(&args.paths, options, !quiet && !args.json);
    let summary = DeletionSummary::from_outcomes(&outcomes);
    let failed = summary.failed_count > 0;
    let cancelled = summary.cancelled_count > 0;

    if args.json {
        let report = DeleteReport {
            dry_run,
            outcomes: &outcomes,
            summary,
        };
        println!("{}", format_json(&report)?);
    } else {
        if dry_run {
            println!("[DRY RUN] Nothing will be removed.");
        }
        print!("{}", format_outcomes(&outcomes, dry_run));
    }

    if cancelled {
        std::process::exit(EXIT_CANCELLED);
    }
    if failed {
        std::process::exit(EXIT_PARTIAL_FAILURE);
    }

    Ok(())
}
