use serde::Serialize;
use std::path::{Path, PathBuf};

/// The only directory name the sweeper ever reports or removes.
pub const VENV_DIR_NAME: &str = "venv";

/// Exact, case-sensitive basename check.
pub fn is_venv_name(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == VENV_DIR_NAME)
}

/// A real `venv` directory found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Absolute, canonical path
    pub path: PathBuf,

    /// Apparent size of all files below the directory
    pub size_bytes: Option<u64>,

    /// Number of regular files below the directory
    pub file_count: Option<u64>,
}

impl Candidate {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            size_bytes: None,
            file_count: None,
        }
    }
}

/// Non-fatal conditions reported alongside a scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    /// A directory could not be read; its subtree was skipped.
    SubtreeUnreadable { path: PathBuf, message: String },
    /// The walk stopped after `limit` candidates.
    ResultLimitReached { limit: usize },
    /// Scanning the filesystem root or the home directory.
    BroadRoot { root: PathBuf },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::SubtreeUnreadable { path, message } => {
                write!(f, "skipped unreadable {}: {}", path.display(), message)
            }
            ScanWarning::ResultLimitReached { limit } => write!(
                f,
                "result limit reached ({limit}); narrow the scan path for complete results"
            ),
            ScanWarning::BroadRoot { root } => write!(
                f,
                "scanning {} can be slow; consider a projects folder instead",
                root.display()
            ),
        }
    }
}

/// Outcome of a single scan. Candidates are sorted by path and unique.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub root: PathBuf,
    pub candidates: Vec<Candidate>,
    pub warnings: Vec<ScanWarning>,
    /// The walk stopped early because the result limit was hit.
    pub truncated: bool,
    /// The walk stopped early because the caller cancelled it.
    pub cancelled: bool,
}

impl ScanResult {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.candidates.iter().map(|c| c.path.clone()).collect()
    }

    /// Sum of known candidate sizes.
    pub fn total_size(&self) -> u64 {
        self.candidates.iter().filter_map(|c| c.size_bytes).sum()
    }

    /// True if any subtree was skipped.
    pub fn is_partial(&self) -> bool {
        self.truncated
            || self.cancelled
            || self
                .warnings
                .iter()
                .any(|w| matches!(w, ScanWarning::SubtreeUnreadable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venv_name_is_exact() {
        assert!(is_venv_name(Path::new("/a/venv")));
        assert!(is_venv_name(Path::new("venv")));
        for name in ["/a/myvenv", "/a/.venv", "/a/VENV", "/a/venv2", "/a/Venv"] {
            assert!(!is_venv_name(Path::new(name)), "{name}");
        }
        assert!(!is_venv_name(Path::new("/")));
    }

    #[test]
    fn total_size_skips_unknown() {
        let result = ScanResult {
            root: PathBuf::from("/work"),
            candidates: vec![
                Candidate {
                    path: PathBuf::from("/work/a/venv"),
                    size_bytes: Some(100),
                    file_count: Some(1),
                },
                Candidate::new(PathBuf::from("/work/b/venv")),
            ],
            warnings: vec![],
            truncated: false,
            cancelled: false,
        };
        assert_eq!(result.total_size(), 100);
        assert!(!result.is_partial());
    }

    #[test]
    fn unreadable_subtree_marks_partial() {
        let result = ScanResult {
            root: PathBuf::from("/work"),
            candidates: vec![],
            warnings: vec![ScanWarning::SubtreeUnreadable {
                path: PathBuf::from("/work/locked"),
                message: "Permission denied".into(),
            }],
            truncated: false,
            cancelled: false,
        };
        assert!(result.is_partial());
    }

    #[test]
    fn warning_serializes_with_kind_tag() {
        let json = serde_json::to_string(&ScanWarning::ResultLimitReached { limit: 5 }).unwrap();
        assert_eq!(json, r#"{"kind":"result_limit_reached","limit":5}"#);
    }
}
