//! A file discovered under the organized root, split into the parts the
//! organizer classifies on.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Marker that makes a file hidden on Unix-like systems.
pub const HIDDEN_MARKER: char = '.';

/// A candidate for organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Base name of the file.
    pub name: String,
    /// Substring after the last `.` of the base name, empty if there is none.
    pub extension: String,
}

impl CandidateFile {
    /// Builds a candidate from a path. Returns `None` for paths without a
    /// final name component (`/`, `..`).
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();
        let extension = match name.rfind('.') {
            Some(index) => name[index + 1..].to_string(),
            None => String::new(),
        };
        Some(Self {
            path,
            name,
            extension,
        })
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with(HIDDEN_MARKER)
    }

    pub fn has_extension(&self) -> bool {
        !self.extension.is_empty()
    }

    /// Returns the file name to use at the destination for a given conflict
    /// attempt.
    ///
    /// Attempt `0` is the original name; attempt `n` inserts `_n` before the
    /// extension, e.g. `report_2.pdf`.
    pub fn name_for_attempt(&self, attempt: usize) -> OsString {
        let original = self.path.file_name().map(OsString::from);
        if attempt == 0 {
            return original.unwrap_or_else(|| OsString::from(&self.name));
        }

        match (self.path.file_stem(), self.path.extension()) {
            (Some(stem), Some(extension)) => {
                let mut name = stem.to_os_string();
                name.push(format!("_{attempt}."));
                name.push(extension);
                name
            }
            _ => OsString::from(format!("{}_{attempt}", self.name)),
        }
    }

    /// Returns the directory containing this file, if any.
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_after_last_dot() {
        let file = CandidateFile::from_path("/data/archive.tar.gz").unwrap();
        assert_eq!(file.name, "archive.tar.gz");
        assert_eq!(file.extension, "gz");
        assert!(file.has_extension());
    }

    #[test]
    fn test_no_extension() {
        let file = CandidateFile::from_path("/data/README").unwrap();
        assert_eq!(file.extension, "");
        assert!(!file.has_extension());
    }

    #[test]
    fn test_trailing_dot_has_no_extension() {
        let file = CandidateFile::from_path("/data/notes.").unwrap();
        assert!(!file.has_extension());
    }

    #[test]
    fn test_hidden_file() {
        let file = CandidateFile::from_path("/data/.bashrc").unwrap();
        assert!(file.is_hidden());

        let file = CandidateFile::from_path("/data/.config.toml").unwrap();
        assert!(file.is_hidden());
        assert_eq!(file.extension, "toml");

        let file = CandidateFile::from_path("/data/visible.txt").unwrap();
        assert!(!file.is_hidden());
    }

    #[test]
    fn test_extension_keeps_case() {
        let file = CandidateFile::from_path("/data/PHOTO.JPG").unwrap();
        assert_eq!(file.extension, "JPG");
    }

    #[test]
    fn test_path_without_file_name() {
        assert!(CandidateFile::from_path("/").is_none());
        assert!(CandidateFile::from_path("..").is_none());
    }

    #[test]
    fn test_name_for_attempt() {
        let file = CandidateFile::from_path("/data/a.jpg").unwrap();
        assert_eq!(file.name_for_attempt(0), OsString::from("a.jpg"));
        assert_eq!(file.name_for_attempt(1), OsString::from("a_1.jpg"));
        assert_eq!(file.name_for_attempt(12), OsString::from("a_12.jpg"));
    }

    #[test]
    fn test_name_for_attempt_with_multiple_dots() {
        let file = CandidateFile::from_path("/data/backup.tar.gz").unwrap();
        assert_eq!(file.name_for_attempt(2), OsString::from("backup.tar_2.gz"));
    }
}
