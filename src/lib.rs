//! venv-sweeper - find and remove Python virtual environment directories
//!
//! This crate provides:
//! - A symlink-safe scanner that lists every directory named exactly `venv`
//! - A deletion executor that re-validates each path before removing it
//! - A command-line front end for interactive cleanup

pub mod cancel;
pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod scanner;

// Re-export commonly used types
pub use cleaner::{DeleteOptions, DeletionExecutor, DeletionOutcome};
pub use config::Config;
pub use error::{Result, SweeperError};
pub use scanner::{Candidate, ScanOptions, ScanResult, Scanner};
