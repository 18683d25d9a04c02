//! Aggregate result of an organization run.

use crate::file_organizer::{MoveOutcome, MoveStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Summary of a run, built from its outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    /// The organized directory.
    pub root: PathBuf,
    /// Files relocated.
    pub moved: usize,
    /// Files a dry run would relocate.
    pub planned: usize,
    /// Files left in place, for any reason.
    pub skipped: usize,
    /// Files that stayed because something went wrong.
    pub failed: usize,
    /// Moved or planned files per destination folder.
    pub folders: BTreeMap<String, usize>,
    /// Description of the first failure, if any.
    pub first_error: Option<String>,
    /// True if the run was cancelled before every file was processed.
    pub cancelled: bool,
    pub outcomes: Vec<MoveOutcome>,
}

impl OrganizeReport {
    pub fn from_outcomes(root: impl Into<PathBuf>, outcomes: Vec<MoveOutcome>) -> Self {
        let mut report = Self {
            root: root.into(),
            moved: 0,
            planned: 0,
            skipped: 0,
            failed: 0,
            folders: BTreeMap::new(),
            first_error: None,
            cancelled: false,
            outcomes: Vec::new(),
        };

        for outcome in &outcomes {
            match &outcome.status {
                MoveStatus::Moved => report.moved += 1,
                MoveStatus::Planned => report.planned += 1,
                MoveStatus::Skipped(reason) => {
                    report.skipped += 1;
                    if reason.is_failure() {
                        report.failed += 1;
                        if report.first_error.is_none() {
                            report.first_error =
                                Some(format!("{}: {}", outcome.source.display(), reason));
                        }
                    }
                }
            }
            if let Some(folder) = outcome.folder() {
                *report.folders.entry(folder).or_insert(0) += 1;
            }
        }

        report.outcomes = outcomes;
        report
    }

    /// True when no file failed. Rule-based skips (hidden, no extension,
    /// excluded, already organized) do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Number of outcomes recorded.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Outcomes that ended in a failure.
    pub fn failures(&self) -> impl Iterator<Item = &MoveOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.skip_reason().is_some_and(|r| r.is_failure()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_organizer::SkipReason;

    fn outcome(source: &str, destination: Option<&str>, status: MoveStatus) -> MoveOutcome {
        MoveOutcome {
            source: PathBuf::from(source),
            destination: destination.map(PathBuf::from),
            status,
        }
    }

    #[test]
    fn test_counts_and_folders() {
        let report = OrganizeReport::from_outcomes(
            "/data",
            vec![
                outcome("/data/a.jpg", Some("/data/Images/a.jpg"), MoveStatus::Moved),
                outcome("/data/b.png", Some("/data/Images/b.png"), MoveStatus::Moved),
                outcome("/data/c.txt", Some("/data/txt/c.txt"), MoveStatus::Moved),
                outcome("/data/.env", None, MoveStatus::Skipped(SkipReason::Hidden)),
            ],
        );

        assert_eq!(report.moved, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.folders.get("Images"), Some(&2));
        assert_eq!(report.folders.get("txt"), Some(&1));
        assert!(report.is_success());
        assert_eq!(report.processed(), 4);
    }

    #[test]
    fn test_first_error_is_kept() {
        let report = OrganizeReport::from_outcomes(
            "/data",
            vec![
                outcome(
                    "/data/a.txt",
                    None,
                    MoveStatus::Skipped(SkipReason::DirectoryCreateFailed("denied".into())),
                ),
                outcome(
                    "/data/b.txt",
                    Some("/data/txt/b.txt"),
                    MoveStatus::Skipped(SkipReason::MoveFailed("gone".into())),
                ),
            ],
        );

        assert!(!report.is_success());
        assert_eq!(report.failed, 2);
        assert_eq!(
            report.first_error.as_deref(),
            Some("/data/a.txt: dir-create-failed: denied")
        );
        assert!(report.folders.is_empty());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_planned_outcomes_count_towards_folders() {
        let report = OrganizeReport::from_outcomes(
            "/data",
            vec![outcome("/data/a.mp3", Some("/data/Music/a.mp3"), MoveStatus::Planned)],
        );

        assert_eq!(report.planned, 1);
        assert_eq!(report.moved, 0);
        assert_eq!(report.folders.get("Music"), Some(&1));
    }
}
