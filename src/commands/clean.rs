//! Clean command implementation: scan, select, confirm, delete, refresh.

use anyhow::Result;
use std::path::PathBuf;

use crate::cleaner::{DeleteOptions, DeletionSummary};
use crate::cli::CleanArgs;
use crate::config::Config;
use crate::formatter::{format_candidates, format_outcomes, format_scan_summary, format_warnings};
use crate::scanner::{format_size, ScanOptions, ScanResult};

use super::{choose_root, confirm, prompt, run_delete, run_scan, EXIT_CANCELLED, EXIT_PARTIAL_FAILURE};

/// Parse a selection such as `1,3-5` or `all` into sorted, unique,
/// zero-based indices into a list of `count` items.
///
/// An empty input selects nothing.
pub fn parse_selection(input: &str, count: usize) -> std::result::Result<Vec<usize>, String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") || input == "*" {
        return Ok((0..count).collect());
    }

    let mut selected = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_index(a, count)?, parse_index(b, count)?),
            None => {
                let i = parse_index(token, count)?;
                (i, i)
            }
        };
        if start > end {
            return Err(format!("invalid range '{token}'"));
        }
        selected.extend(start..=end);
    }

    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

fn parse_index(raw: &str, count: usize) -> std::result::Result<usize, String> {
    let n: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if n == 0 || n > count {
        return Err(format!("{n} is out of range (1-{count})"));
    }
    Ok(n - 1)
}

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config, quiet: bool) -> Result<()> {
    let root = choose_root(args.path.as_deref(), config);
    let options = ScanOptions::from(&config.scanner);

    println!("Scanning for venv directories in {}...", root.display());
    let result = run_scan(&root, options.clone(), !quiet)?;
    print_scan(&result);

    if result.cancelled {
        std::process::exit(EXIT_CANCELLED);
    }
    if result.candidates.is_empty() {
        return Ok(());
    }

    let selected = if args.all {
        result.paths()
    } else {
        match select(&result)? {
            Some(paths) => paths,
            None => {
                println!("Aborted.");
                return Ok(());
            }
        }
    };

    if selected.contains(&result.root) {
        println!(
            "\nwarning: the scan root {} is itself a venv directory and is selected.",
            result.root.display()
        );
    }

    if !args.yes && !args.dry_run {
        let selected_size: u64 = result
            .candidates
            .iter()
            .filter(|c| selected.contains(&c.path))
            .filter_map(|c| c.size_bytes)
            .sum();
        let question = format!(
            "\nAre you sure you want to permanently delete the selected venv folders? ({} selected, {})",
            selected.len(),
            format_size(selected_size)
        );
        if !confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let delete_options = DeleteOptions {
        dry_run: args.dry_run,
        jobs: args.jobs.unwrap_or(config.cleaner.parallel_jobs).max(1),
        root: config.cleaner.confine_to_root.then(|| result.root.clone()),
    };

    if args.dry_run {
        println!("\n[DRY RUN] Would delete:");
    } else {
        println!("\nDeleting...");
    }

    let outcomes = run_delete(&selected, delete_options, !quiet);
    print!("{}", format_outcomes(&outcomes, args.dry_run));
    let summary = DeletionSummary::from_outcomes(&outcomes);

    // Refresh so the listing reflects what is actually left on disk.
    // A deleted root (itself a venv) leaves nothing to refresh.
    if !args.dry_run && summary.cancelled_count == 0 && result.root.is_dir() {
        println!("\nRefreshing...");
        let refreshed = run_scan(&result.root, options, !quiet)?;
        print_scan(&refreshed);
    }

    if summary.cancelled_count > 0 {
        std::process::exit(EXIT_CANCELLED);
    }
    if summary.failed_count > 0 {
        std::process::exit(EXIT_PARTIAL_FAILURE);
    }

    Ok(())
}

fn print_scan(result: &ScanResult) {
    eprint!("{}", format_warnings(result));
    if result.candidates.is_empty() {
        println!("No venv directories found under {}.", result.root.display());
        return;
    }
    println!();
    print!("{}", format_candidates(result));
    println!("\n{}", format_scan_summary(result));
}

/// Prompt until the selection parses. `None` means the user entered nothing.
fn select(result: &ScanResult) -> Result<Option<Vec<PathBuf>>> {
    loop {
        let input = prompt("\nSelect directories to delete (e.g. 1,3-5 or 'all'; empty to abort): ")?;
        if input.is_empty() {
            return Ok(None);
        }
        match parse_selection(&input, result.candidates.len()) {
            Ok(indices) if indices.is_empty() => return Ok(None),
            Ok(indices) => {
                return Ok(Some(
                    indices
                        .into_iter()
                        .map(|i| result.candidates[i].path.clone())
                        .collect(),
                ))
            }
            Err(e) => println!("Invalid selection: {e}"),
        }
    }
}
