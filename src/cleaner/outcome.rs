//! Per-path deletion outcomes.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a requested path was no longer eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    NotAbsolute,
    NotNamedVenv,
    Symlink,
    NotADirectory,
    /// An ancestor was replaced by a symlink; the path now leads elsewhere.
    ResolvesElsewhere,
    OutsideRoot,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::NotAbsolute => "not an absolute path",
            InvalidReason::NotNamedVenv => "not named 'venv'",
            InvalidReason::Symlink => "is a symlink",
            InvalidReason::NotADirectory => "not a directory",
            InvalidReason::ResolvesElsewhere => "resolves through a symlink",
            InvalidReason::OutsideRoot => "outside the scanned root",
        };
        f.write_str(text)
    }
}

/// Result of processing one requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionOutcome {
    /// Removed (or, in a dry run, would have been removed).
    Deleted { path: PathBuf, freed_bytes: u64 },
    /// Nothing exists at the path anymore.
    SkippedMissing { path: PathBuf },
    /// Something exists, but it is no longer a real `venv` directory.
    SkippedInvalidated { path: PathBuf, reason: InvalidReason },
    /// Removal was attempted and failed.
    Failed { path: PathBuf, error: String },
    /// Never started because the call was cancelled.
    Cancelled { path: PathBuf },
}

impl DeletionOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DeletionOutcome::Deleted { path, .. }
            | DeletionOutcome::SkippedMissing { path }
            | DeletionOutcome::SkippedInvalidated { path, .. }
            | DeletionOutcome::Failed { path, .. }
            | DeletionOutcome::Cancelled { path } => path,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted { .. })
    }
}

impl fmt::Display for DeletionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionOutcome::Deleted { path, .. } => write!(f, "deleted {}", path.display()),
            DeletionOutcome::SkippedMissing { path } => {
                write!(f, "skipped {}: does not exist", path.display())
            }
            DeletionOutcome::SkippedInvalidated { path, reason } => {
                write!(f, "skipped {}: {}", path.display(), reason)
            }
            DeletionOutcome::Failed { path, error } => {
                write!(f, "failed {}: {}", path.display(), error)
            }
            DeletionOutcome::Cancelled { path } => write!(f, "cancelled {}", path.display()),
        }
    }
}

/// Summary of deletion results.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub deleted_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub cancelled_count: usize,
    pub total_freed: u64,
}

impl DeletionSummary {
    pub fn from_outcomes(outcomes: &[DeletionOutcome]) -> Self {
        let mut summary = Self::default();

        for outcome in outcomes {
            match outcome {
                DeletionOutcome::Deleted { freed_bytes, .. } => {
                    summary.deleted_count += 1;
                    summary.total_freed += freed_bytes;
                }
                DeletionOutcome::SkippedMissing { .. }
                | DeletionOutcome::SkippedInvalidated { .. } => summary.skipped_count += 1,
                DeletionOutcome::Failed { .. } => summary.failed_count += 1,
                DeletionOutcome::Cancelled { .. } => summary.cancelled_count += 1,
            }
        }

        summary
    }
}
