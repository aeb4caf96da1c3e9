//! Removal of confirmed venv directories.
//!
//! This module provides:
//! - Delete-time re-validation of each requested path
//! - Per-path outcomes and their summary
//! - Parallel, cancellable deletion

mod executor;
mod outcome;
mod validate;

pub use executor::{DeleteOptions, DeleteProgress, DeletionExecutor};
pub use outcome::{DeletionOutcome, DeletionSummary, InvalidReason};
pub use validate::{revalidate, Revalidation};
