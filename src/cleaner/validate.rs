//! Delete-time re-validation against the live filesystem.

use std::fs;
use std::io;
use std::path::Path;

use nix::errno::Errno;

use crate::scanner::is_venv_name;

use super::outcome::InvalidReason;

/// Live state of a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidation {
    /// Still a real `venv` directory at exactly this path.
    Valid,
    Missing,
    Invalidated(InvalidReason),
}

/// Re-check `path` right before removal, trusting nothing from the scan.
///
/// `path` must already be normalized. When `root` is given (canonical), the
/// path must be the root or lie beneath it. Errors are stat failures other
/// than "not found".
pub fn revalidate(path: &Path, root: Option<&Path>) -> io::Result<Revalidation> {
    if !path.is_absolute() {
        return Ok(Revalidation::Invalidated(InvalidReason::NotAbsolute));
    }

    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if is_gone(&e) => return Ok(Revalidation::Missing),
        Err(e) => return Err(e),
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        return Ok(Revalidation::Invalidated(InvalidReason::Symlink));
    }
    if !file_type.is_dir() {
        return Ok(Revalidation::Invalidated(InvalidReason::NotADirectory));
    }
    if !is_venv_name(path) {
        return Ok(Revalidation::Invalidated(InvalidReason::NotNamedVenv));
    }

    let canonical = match path.canonicalize() {
        Ok(c) => c,
        Err(e) if is_gone(&e) => return Ok(Revalidation::Missing),
        Err(e) => return Err(e),
    };
    if canonical.as_path() != path {
        return Ok(Revalidation::Invalidated(InvalidReason::ResolvesElsewhere));
    }

    if let Some(root) = root {
        if !path.starts_with(root) {
            return Ok(Revalidation::Invalidated(InvalidReason::OutsideRoot));
        }
    }

    Ok(Revalidation::Valid)
}

/// Nothing exists at the path: either it is gone, or an ancestor is now a
/// regular file (ENOTDIR).
fn is_gone(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound || err.raw_os_error() == Some(Errno::ENOTDIR as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn canonical_tmp() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        (tmp, root)
    }

    #[test]
    fn test_valid_venv() {
        let (_tmp, root) = canonical_tmp();
        let venv = root.join("p/venv");
        fs::create_dir_all(&venv).unwrap();

        assert_eq!(revalidate(&venv, None).unwrap(), Revalidation::Valid);
        assert_eq!(revalidate(&venv, Some(&root)).unwrap(), Revalidation::Valid);
    }

    #[test]
    fn test_missing() {
        let (_tmp, root) = canonical_tmp();
        assert_eq!(
            revalidate(&root.join("gone/venv"), None).unwrap(),
            Revalidation::Missing
        );
    }

    #[test]
    fn test_ancestor_replaced_by_file_is_missing() {
        let (_tmp, root) = canonical_tmp();
        fs::create_dir_all(root.join("proj/venv")).unwrap();
        fs::remove_dir_all(root.join("proj")).unwrap();
        fs::write(root.join("proj"), "x").unwrap();

        assert_eq!(
            revalidate(&root.join("proj/venv"), None).unwrap(),
            Revalidation::Missing
        );
    }

    #[test]
    fn test_relative_path_is_rejected() {
        assert_eq!(
            revalidate(Path::new("p/venv"), None).unwrap(),
            Revalidation::Invalidated(InvalidReason::NotAbsolute)
        );
    }

    #[test]
    fn test_symlink_is_rejected() {
        let (_tmp, root) = canonical_tmp();
        fs::create_dir_all(root.join("target")).unwrap();
        symlink(root.join("target"), root.join("venv")).unwrap();

        assert_eq!(
            revalidate(&root.join("venv"), None).unwrap(),
            Revalidation::Invalidated(InvalidReason::Symlink)
        );
    }

    #[test]
    fn test_file_is_rejected() {
        let (_tmp, root) = canonical_tmp();
        fs::write(root.join("venv"), "x").unwrap();

        assert_eq!(
            revalidate(&root.join("venv"), None).unwrap(),
            Revalidation::Invalidated(InvalidReason::NotADirectory)
        );
    }

    #[test]
    fn test_wrong_name_is_rejected() {
        let (_tmp, root) = canonical_tmp();
        fs::create_dir_all(root.join(".venv")).unwrap();

        assert_eq!(
            revalidate(&root.join(".venv"), None).unwrap(),
            Revalidation::Invalidated(InvalidReason::NotNamedVenv)
        );
    }

    #[test]
    fn test_symlinked_ancestor_is_rejected() {
        let (_tmp, root) = canonical_tmp();
        fs::create_dir_all(root.join("real/venv")).unwrap();
        symlink(root.join("real"), root.join("alias")).unwrap();

        assert_eq!(
            revalidate(&root.join("alias/venv"), None).unwrap(),
            Revalidation::Invalidated(InvalidReason::ResolvesElsewhere)
        );
    }

    #[test]
    fn test_outside_root_is_rejected() {
        let (_tmp, base) = canonical_tmp();
        fs::create_dir_all(base.join("scanned")).unwrap();
        fs::create_dir_all(base.join("other/venv")).unwrap();

        assert_eq!(
            revalidate(&base.join("other/venv"), Some(&base.join("scanned"))).unwrap(),
            Revalidation::Invalidated(InvalidReason::OutsideRoot)
        );
    }

    #[test]
    fn test_root_itself_is_allowed() {
        let (_tmp, base) = canonical_tmp();
        let venv = base.join("venv");
        fs::create_dir_all(&venv).unwrap();

        assert_eq!(revalidate(&venv, Some(&venv)).unwrap(), Revalidation::Valid);
    }
}
