//! Executor for removing confirmed venv directories.

use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::cancel::CancelToken;
use crate::scanner::{lexical_clean, measure_dir};

use super::outcome::DeletionOutcome;
use super::validate::{revalidate, Revalidation};

/// Options for the deletion executor.
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    /// If true, validate and measure but don't delete anything.
    pub dry_run: bool,
    /// Number of paths processed concurrently.
    pub jobs: usize,
    /// Canonical root every deleted path must lie under.
    pub root: Option<PathBuf>,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
            root: None,
        }
    }
}

/// Progress tracker for deletion.
pub struct DeleteProgress {
    /// Total number of paths requested.
    pub total: usize,
    completed: AtomicUsize,
    current: Mutex<Option<PathBuf>>,
}

impl DeleteProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Path most recently started.
    pub fn current(&self) -> Option<PathBuf> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    fn start(&self, path: &Path) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(path.to_path_buf());
        }
    }

    fn increment(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Removes requested paths after re-validating each one.
pub struct DeletionExecutor {
    options: DeleteOptions,
    cancel: Option<CancelToken>,
    progress: Option<Arc<DeleteProgress>>,
}

impl DeletionExecutor {
    pub fn new(options: DeleteOptions) -> Self {
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

    pub fn with_progress(mut self, progress: Arc<DeleteProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Process every distinct requested path, returning outcomes in request
    /// order. One path's failure never affects the others.
    pub fn delete(&self, paths: &[PathBuf]) -> Vec<DeletionOutcome> {
        let mut seen = HashSet::new();
        let requested: Vec<PathBuf> = paths
            .iter()
            .map(|p| lexical_clean(p))
            .filter(|p| seen.insert(p.clone()))
            .collect();

        tracing::info!(
            count = requested.len(),
            dry_run = self.options.dry_run,
            "Deleting venv directories"
        );

        if self.options.jobs <= 1 {
            return requested.into_iter().map(|p| self.process(p)).collect();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
        {
            Ok(pool) => pool.install(|| {
                requested
                    .into_par_iter()
                    .map(|p| self.process(p))
                    .collect()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to sequential deletion");
                requested.into_iter().map(|p| self.process(p)).collect()
            }
        }
    }

    fn process(&self, path: PathBuf) -> DeletionOutcome {
        // Only unstarted paths are cancelled; a removal in flight completes.
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return DeletionOutcome::Cancelled { path };
        }

        if let Some(progress) = &self.progress {
            progress.start(&path);
        }

        let outcome = match revalidate(&path, self.options.root.as_deref()) {
            Ok(Revalidation::Valid) => self.remove(path),
            Ok(Revalidation::Missing) => {
                tracing::debug!(path = %path.display(), "Already gone");
                DeletionOutcome::SkippedMissing { path }
            }
            Ok(Revalidation::Invalidated(reason)) => {
                tracing::warn!(path = %path.display(), %reason, "Refusing to delete");
                DeletionOutcome::SkippedInvalidated { path, reason }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot inspect path");
                DeletionOutcome::Failed {
                    path,
                    error: e.to_string(),
                }
            }
        };

        if let Some(progress) = &self.progress {
            progress.increment();
        }

        outcome
    }

    fn remove(&self, path: PathBuf) -> DeletionOutcome {
        let (freed_bytes, _) = measure_dir(&path);

        if self.options.dry_run {
            tracing::info!(path = %path.display(), "[dry run] would delete");
            return DeletionOutcome::Deleted { path, freed_bytes };
        }

        match remove_tree(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), freed_bytes, "Deleted");
                DeletionOutcome::Deleted { path, freed_bytes }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && !path.exists() => {
                tracing::debug!(path = %path.display(), "Removed concurrently");
                DeletionOutcome::SkippedMissing { path }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Delete failed");
                DeletionOutcome::Failed {
                    path,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// `remove_dir_all` never follows symlinks inside the tree; afterwards the
/// path must be gone.
fn remove_tree(path: &Path) -> io::Result<()> {
    fs::remove_dir_all(path)?;
    if fs::symlink_metadata(path).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "path still exists after deletion",
        ));
    }
    Ok(())
}
