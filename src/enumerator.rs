//! Discovery of the files to organize.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the regular files below `root`.
///
/// Without `recurse`, only files directly inside `root` are returned; with it,
/// files at any depth are. Directories and symbolic links are never returned.
/// Entries are sorted by file name within each directory, so an unchanged tree
/// always yields the same sequence. Returned paths are absolute.
///
/// # Errors
///
/// Returns [`OrganizeError::NotFound`] if `root` is missing, is not a directory,
/// or stops being readable while it is walked. Unreadable nested entries are
/// logged and skipped.
pub fn enumerate(root: &Path, recurse: bool) -> OrganizeResult<Vec<PathBuf>> {
    let root = std::path::absolute(root).map_err(|_| not_found(root))?;
    if !root.is_dir() {
        return Err(not_found(&root));
    }

    let mut walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if !recurse {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Err(e) if e.depth() == 0 => return Err(not_found(&root)),
            Err(e) => {
                tracing::warn!(
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable entry"
                );
            }
        }
    }

    if !root.is_dir() {
        return Err(not_found(&root));
    }

    tracing::debug!(root = %root.display(), files = files.len(), recurse, "Enumerated files");
    Ok(files)
}

fn not_found(path: &Path) -> OrganizeError {
    OrganizeError::NotFound {
        path: path.to_path_buf(),
    }
}
