//! Read-only discovery of `venv` directories.

mod candidate;
mod options;
mod root;
mod size;
mod walker;

pub use candidate::{is_venv_name, Candidate, ScanResult, ScanWarning, VENV_DIR_NAME};
pub use options::ScanOptions;
pub use root::{is_broad_root, lexical_clean, normalize, normalize_path, resolve_root};
pub use size::{format_size, measure_dir};
pub use walker::{ScanProgress, Scanner};
