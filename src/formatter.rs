//! Text and JSON rendering of scan results and deletion outcomes.

use serde::Serialize;

use crate::cleaner::{DeletionOutcome, DeletionSummary};
use crate::scanner::{format_size, ScanResult};

/// Numbered table of candidates. Indices start at 1 and match what the
/// interactive selection accepts.
pub fn format_candidates(result: &ScanResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:>5}  {:>12}  {}\n", "#", "SIZE", "PATH"));
    output.push_str(&format!("{:->5}  {:->12}  {:-<50}\n", "", "", ""));

    for (i, candidate) in result.candidates.iter().enumerate() {
        let size = candidate
            .size_bytes
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:>5}  {:>12}  {}\n",
            i + 1,
            size,
            candidate.path.display()
        ));
    }

    output
}

/// One line per warning, prefixed with `warning:`.
pub fn format_warnings(result: &ScanResult) -> String {
    result
        .warnings
        .iter()
        .map(|w| format!("warning: {w}\n"))
        .collect()
}

/// Footer line such as `Found 3 venv directories (1.2 MiB) under /work`.
pub fn format_scan_summary(result: &ScanResult) -> String {
    let count = result.candidates.len();
    let mut line = format!(
        "Found {} venv director{}",
        count,
        if count == 1 { "y" } else { "ies" }
    );
    if result.candidates.iter().any(|c| c.size_bytes.is_some()) {
        line.push_str(&format!(" ({})", format_size(result.total_size())));
    }
    line.push_str(&format!(" under {}", result.root.display()));
    if result.cancelled {
        line.push_str(" [cancelled]");
    } else if result.is_partial() {
        line.push_str(" [partial]");
    }
    line
}

/// Per-path outcome lines followed by totals.
pub fn format_outcomes(outcomes: &[DeletionOutcome], dry_run: bool) -> String {
    let mut output = String::new();

    for outcome in outcomes {
        let marker = match outcome {
            DeletionOutcome::Deleted { .. } => "ok",
            DeletionOutcome::SkippedMissing { .. }
            | DeletionOutcome::SkippedInvalidated { .. } => "skip",
            DeletionOutcome::Failed { .. } => "FAIL",
            DeletionOutcome::Cancelled { .. } => "stop",
        };
        output.push_str(&format!("  [{marker:>4}] {outcome}\n"));
    }

    let summary = DeletionSummary::from_outcomes(outcomes);
    let verb = if dry_run { "Would delete" } else { "Deleted" };
    output.push_str(&format!(
        "\n{}: {}  Skipped: {}  Failed: {}",
        verb, summary.deleted_count, summary.skipped_count, summary.failed_count
    ));
    if summary.cancelled_count > 0 {
        output.push_str(&format!("  Cancelled: {}", summary.cancelled_count));
    }
    output.push_str(&format!("  Freed: {}\n", format_size(summary.total_freed)));

    output
}

/// Pretty JSON for any serializable report.
pub fn format_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
