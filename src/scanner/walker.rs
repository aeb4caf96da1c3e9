use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::cancel::CancelToken;
use crate::error::Result;

use super::candidate::{is_venv_name, Candidate, ScanResult, ScanWarning, VENV_DIR_NAME};
use super::options::ScanOptions;
use super::root::{is_broad_root, resolve_root};
use super::size::measure_dir;

/// Counters a caller can poll while a scan runs.
#[derive(Debug, Default)]
pub struct ScanProgress {
    dirs_visited: AtomicUsize,
    found: AtomicUsize,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dirs_visited(&self) -> usize {
        self.dirs_visited.load(Ordering::Relaxed)
    }

    pub fn found(&self) -> usize {
        self.found.load(Ordering::Relaxed)
    }

    fn visit(&self) {
        self.dirs_visited.fetch_add(1, Ordering::Relaxed);
    }

    fn record_match(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read-only walker that finds `venv` directories below a root.
pub struct Scanner {
    options: ScanOptions,
    cancel: Option<CancelToken>,
    progress: Option<Arc<ScanProgress>>,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            cancel: None,
            progress: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, progress: Arc<ScanProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scan `root` for directories named exactly `venv`.
    ///
    /// Fails only when `root` is not an existing directory. Unreadable
    /// subtrees become warnings on the returned result.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let root = resolve_root(root)?;
        tracing::info!(root = %root.display(), "Scanning for {} directories", VENV_DIR_NAME);

        let mut result = ScanResult {
            root: root.clone(),
            candidates: Vec::new(),
            warnings: Vec::new(),
            truncated: false,
            cancelled: false,
        };

        if self.options.warn_broad_root && is_broad_root(&root) {
            result.warnings.push(ScanWarning::BroadRoot { root: root.clone() });
        }

        if is_venv_name(&root) {
            tracing::debug!("Scan root is itself a venv directory");
            self.record_match();
            result.candidates.push(Candidate::new(root));
        } else {
            self.walk(&root, &mut result);
        }

        result.candidates.sort_by(|a, b| a.path.cmp(&b.path));
        result.candidates.dedup_by(|a, b| a.path == b.path);

        if self.options.compute_sizes && !result.cancelled {
            self.measure(&mut result.candidates);
        }

        tracing::info!(
            found = result.candidates.len(),
            warnings = result.warnings.len(),
            truncated = result.truncated,
            cancelled = result.cancelled,
            "Scan finished"
        );

        Ok(result)
    }

    fn walk(&self, root: &Path, result: &mut ScanResult) {
        let limit = self.options.max_results.max(1);
        // follow_links(false): file_type() describes the link itself, and
        // walkdir never descends through a symlink.
        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        loop {
            let entry = match walker.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    let message = err
                        .io_error()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| err.to_string());
                    tracing::warn!(path = %path.display(), %message, "Skipping unreadable subtree");
                    result
                        .warnings
                        .push(ScanWarning::SubtreeUnreadable { path, message });
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                tracing::trace!(path = %entry.path().display(), "Not following symlink");
                continue;
            }
            if !file_type.is_dir() {
                continue;
            }

            if self.is_cancelled() {
                tracing::info!("Scan cancelled");
                result.cancelled = true;
                break;
            }

            if let Some(progress) = &self.progress {
                progress.visit();
            }

            if entry.depth() > 0 && entry.file_name() == VENV_DIR_NAME {
                tracing::debug!(path = %entry.path().display(), "Found venv");
                walker.skip_current_dir();
                self.record_match();
                result.candidates.push(Candidate::new(entry.into_path()));

                if result.candidates.len() >= limit {
                    tracing::warn!(limit, "Result limit reached");
                    result.truncated = true;
                    result.warnings.push(ScanWarning::ResultLimitReached { limit });
                    break;
                }
            }
        }
    }

    fn measure(&self, candidates: &mut [Candidate]) {
        let fill = |c: &mut Candidate| {
            let (bytes, files) = measure_dir(&c.path);
            c.size_bytes = Some(bytes);
            c.file_count = Some(files);
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build();

        match pool {
            Ok(pool) => pool.install(|| candidates.par_iter_mut().for_each(fill)),
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to sequential size measurement");
                candidates.iter_mut().for_each(fill);
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn record_match(&self) {
        if let Some(progress) = &self.progress {
            progress.record_match();
        }
    }
}
