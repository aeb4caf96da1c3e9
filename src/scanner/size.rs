use humansize::BINARY;
use std::path::Path;
use walkdir::WalkDir;

/// Apparent size and file count of everything below `path`.
///
/// Symlinks are counted as neither files nor followed. Unreadable entries
/// are ignored.
pub fn measure_dir(path: &Path) -> (u64, u64) {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .fold((0, 0), |(bytes, files), m| (bytes + m.len(), files + 1))
}

/// Format size in human-readable binary units
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, BINARY)
}
