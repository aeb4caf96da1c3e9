//! Subcommand implementations and the plumbing they share.

pub mod clean;
pub mod delete;
pub mod scan;

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cancel::{CancelToken, InterruptGuard};
use crate::cleaner::{DeleteOptions, DeleteProgress, DeletionExecutor, DeletionOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::scanner::{ScanOptions, ScanProgress, ScanResult, Scanner};

/// Some deletions failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 5;
/// The user interrupted a scan or deletion.
pub const EXIT_CANCELLED: i32 = 130;

/// Root from the command line, else the configured default, else `.`.
pub fn choose_root(arg: Option<&Path>, config: &Config) -> PathBuf {
    arg.map(Path::to_path_buf)
        .or_else(|| config.scanner.default_root.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Run a scan with Ctrl-C wired to cancellation and an optional spinner.
pub fn run_scan(root: &Path, options: ScanOptions, show_progress: bool) -> Result<ScanResult> {
    let token = CancelToken::new();
    let _guard = install_interrupt(&token);
    let progress = Arc::new(ScanProgress::new());
    let scanner = Scanner::new(options)
        .with_cancel(token)
        .with_progress(Arc::clone(&progress));

    with_spinner(
        show_progress,
        || scanner.scan(root),
        || {
            format!(
                "Scanning... {} directories, {} found",
                progress.dirs_visited(),
                progress.found()
            )
        },
    )
}

/// Run a deletion with Ctrl-C wired to cancellation and an optional spinner.
pub fn run_delete(
    paths: &[PathBuf],
    options: DeleteOptions,
    show_progress: bool,
) -> Vec<DeletionOutcome> {
    let token = CancelToken::new();
    let _guard = install_interrupt(&token);
    let progress = Arc::new(DeleteProgress::new(paths.len()));
    let executor = DeletionExecutor::new(options)
        .with_cancel(token)
        .with_progress(Arc::clone(&progress));

    with_spinner(
        show_progress,
        || executor.delete(paths),
        || {
            let current = progress
                .current()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            format!(
                "Deleting ({}/{}) {}",
                progress.completed(),
                progress.total,
                current
            )
        },
    )
}

fn install_interrupt(token: &CancelToken) -> Option<InterruptGuard> {
    match InterruptGuard::install(token) {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!(error = %e, "Ctrl-C will not cancel cleanly");
            None
        }
    }
}

fn with_spinner<T, W, M>(show: bool, work: W, message: M) -> T
where
    T: Send,
    W: FnOnce() -> T + Send,
    M: Fn() -> String,
{
    if !show {
        return work();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = std::thread::scope(|s| {
        let handle = s.spawn(work);
        while !handle.is_finished() {
            spinner.set_message(message());
            std::thread::sleep(Duration::from_millis(50));
        }
        match handle.join() {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    });

    spinner.finish_and_clear();
    result
}

/// Print `question [y/N] ` and read a yes/no answer. EOF counts as no.
pub fn confirm(question: &str) -> io::Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Print `text` and read one trimmed line from stdin.
pub fn prompt(text: &str) -> io::Result<String> {
    print!("{text}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
