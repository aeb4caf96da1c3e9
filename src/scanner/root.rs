//! Normalization and validation of user-supplied paths.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SweeperError};

/// Expand a leading `~` and `$VAR` / `${VAR}` references, then collapse
/// `.` and `..` components without touching the filesystem.
///
/// Unknown variables are left as written. Relative results stay relative.
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PathBuf::new();
    }

    let expanded = expand_home(&expand_vars(trimmed));
    lexical_clean(Path::new(&expanded))
}

/// [`normalize_path`] for a path the user typed. Non-UTF-8 paths only get
/// the lexical cleanup.
pub fn normalize(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => normalize_path(s),
        None => lexical_clean(path),
    }
}

/// Normalize `raw`, make it absolute and canonicalize it, requiring an
/// existing directory.
pub fn resolve_root(raw: &Path) -> Result<PathBuf> {
    let normalized = normalize(raw);
    if normalized.as_os_str().is_empty() {
        return Err(SweeperError::invalid_root(raw, "path is empty"));
    }

    let absolute = if normalized.is_absolute() {
        normalized
    } else {
        let cwd = env::current_dir().map_err(|source| SweeperError::Io {
            path: normalized.clone(),
            source,
        })?;
        lexical_clean(&cwd.join(normalized))
    };

    let canonical = absolute
        .canonicalize()
        .map_err(|e| SweeperError::invalid_root(&absolute, format!("path does not exist ({e})")))?;

    if !canonical.is_dir() {
        return Err(SweeperError::invalid_root(
            &canonical,
            "path is not a directory",
        ));
    }

    Ok(canonical)
}

/// True for `/` and the current user's home directory.
pub fn is_broad_root(root: &Path) -> bool {
    if root.parent().is_none() {
        return true;
    }
    dirs::home_dir()
        .and_then(|h| h.canonicalize().ok())
        .is_some_and(|home| home == root)
}

fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.display(), &path[1..]);
        }
    }
    path.to_string()
}

fn expand_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), env::var(name)) {
            (false, Ok(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// Collapse `.` and `..` components and drop trailing separators.
///
/// Names are taken literally: `$X` and `~` stay as written.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert_eq!(normalize_path("   "), PathBuf::new());
    }

    #[test]
    fn collapses_dot_and_dotdot() {
        assert_eq!(
            normalize_path("/work/./a/../b/venv"),
            PathBuf::from("/work/b/venv")
        );
        assert_eq!(normalize_path("/.."), PathBuf::from("/"));
        assert_eq!(normalize_path("../x"), PathBuf::from("../x"));
    }

    #[test]
    fn trims_whitespace_and_trailing_slash() {
        assert_eq!(normalize_path("  /work/venv/ "), PathBuf::from("/work/venv"));
    }

    #[test]
    fn expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(normalize_path("~/projects"), home.join("projects"));
        }
    }

    #[test]
    fn expands_known_vars_and_keeps_unknown() {
        env::set_var("VENV_SWEEPER_TEST_BASE", "/srv/code");
        assert_eq!(
            normalize_path("$VENV_SWEEPER_TEST_BASE/app"),
            PathBuf::from("/srv/code/app")
        );
        assert_eq!(
            normalize_path("${VENV_SWEEPER_TEST_BASE}/app"),
            PathBuf::from("/srv/code/app")
        );
        assert_eq!(
            normalize_path("/x/$VENV_SWEEPER_SURELY_UNSET/y"),
            PathBuf::from("/x/$VENV_SWEEPER_SURELY_UNSET/y")
        );
    }

    #[test]
    fn lexical_clean_keeps_names_literal() {
        env::set_var("VENV_SWEEPER_TEST_LITERAL", "/elsewhere");
        assert_eq!(
            lexical_clean(Path::new("/work/$VENV_SWEEPER_TEST_LITERAL/./venv/")),
            PathBuf::from("/work/$VENV_SWEEPER_TEST_LITERAL/venv")
        );
        assert_eq!(
            lexical_clean(Path::new("/work/~/a/../venv")),
            PathBuf::from("/work/~/venv")
        );
    }

    #[test]
    fn resolve_root_rejects_missing() {
        let err = resolve_root(Path::new("/nonexistent/path/12345")).unwrap_err();
        assert!(matches!(err, SweeperError::InvalidRoot { .. }));
    }

    #[test]
    fn resolve_root_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = resolve_root(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn resolve_root_rejects_empty() {
        assert!(matches!(
            resolve_root(Path::new("")),
            Err(SweeperError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn resolve_root_canonicalizes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let raw = tmp.path().join("sub/../sub/.");
        let resolved = resolve_root(&raw).unwrap();
        assert_eq!(resolved, tmp.path().join("sub").canonicalize().unwrap());
    }

    #[test]
    fn filesystem_root_is_broad() {
        assert!(is_broad_root(Path::new("/")));
        assert!(!is_broad_root(Path::new("/definitely/not/home")));
    }
}
