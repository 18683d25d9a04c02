/// File organization system for moving files into extension folders.
///
/// This module classifies candidate files by extension and moves each one into a
/// folder directly below the organized root. It handles destination directory
/// creation, conflict-safe renaming and cross-device moves, and reports every
/// action through an [`EventSink`].
use crate::candidate::CandidateFile;
use crate::config::CompiledFilters;
use crate::events::{EventSink, OrganizeEvent};
use crate::extension_map::ExtensionMap;
use filetime::FileTime;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Upper bound on `name_N.ext` attempts before giving up on a file.
pub const MAX_CONFLICT_ATTEMPTS: usize = 10_000;

/// Errors that can occur during file organization.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// The root path is missing or is not a directory.
    #[error("Directory not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// Failed to create a destination folder.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file into its destination folder.
    #[error("Failed to move {} to {}: {cause}", path.display(), destination.display())]
    Move {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        cause: io::Error,
    },
    /// Every candidate name up to the attempt limit was taken.
    #[error("No free name for {name} in {} after {attempts} attempts", directory.display())]
    ConflictResolution {
        directory: PathBuf,
        name: String,
        attempts: usize,
    },
    /// The audit log could not be opened.
    #[error("Failed to open audit log {}: {source}", path.display())]
    Audit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Why a file was left where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The base name starts with `.`.
    Hidden,
    /// The base name has nothing after its last `.`, or no `.` at all.
    NoExtension,
    /// A configured exclusion matched.
    Excluded,
    /// The file already sits in the folder it would be moved to.
    AlreadyOrganized,
    /// The destination folder could not be created.
    DirectoryCreateFailed(String),
    /// No free destination name was found.
    ConflictUnresolved(String),
    /// The move itself failed.
    MoveFailed(String),
}

impl SkipReason {
    /// Returns true for skips caused by an error rather than by a rule.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::DirectoryCreateFailed(_) | Self::ConflictUnresolved(_) | Self::MoveFailed(_)
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden"),
            Self::NoExtension => write!(f, "no-extension"),
            Self::Excluded => write!(f, "excluded"),
            Self::AlreadyOrganized => write!(f, "already-organized"),
            Self::DirectoryCreateFailed(cause) => write!(f, "dir-create-failed: {}", cause),
            Self::ConflictUnresolved(cause) => write!(f, "conflict-unresolved: {}", cause),
            Self::MoveFailed(cause) => write!(f, "move-failed: {}", cause),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&OrganizeError> for SkipReason {
    fn from(error: &OrganizeError) -> Self {
        match error {
            OrganizeError::DirectoryCreate { source, .. } => {
                Self::DirectoryCreateFailed(source.to_string())
            }
            OrganizeError::ConflictResolution { attempts, .. } => {
                Self::ConflictUnresolved(format!("{} candidate names taken", attempts))
            }
            OrganizeError::Move { cause, .. } => Self::MoveFailed(cause.to_string()),
            OrganizeError::NotFound { .. } | OrganizeError::Audit { .. } => {
                Self::MoveFailed(error.to_string())
            }
        }
    }
}

/// Final state of a processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum MoveStatus {
    Moved,
    /// Dry run only: the file would have been moved.
    Planned,
    Skipped(SkipReason),
}

/// One record per processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub source: PathBuf,
    /// Where the file went (or would go). `None` when it was skipped before a
    /// destination was chosen.
    pub destination: Option<PathBuf>,
    #[serde(flatten)]
    pub status: MoveStatus,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        self.status == MoveStatus::Moved
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.status {
            MoveStatus::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    /// Name of the folder the file went into, if it was moved or planned.
    pub fn folder(&self) -> Option<String> {
        if matches!(self.status, MoveStatus::Skipped(_)) {
            return None;
        }
        self.destination
            .as_deref()
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Shared flag for cooperative cancellation between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the run stop before its next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Organizes files by moving them into extension folders below a root.
///
/// Files are processed one at a time in the order given. Apart from sharing
/// destination folders, each file is handled independently: a failure on one
/// file is recorded in its outcome and the run moves on.
pub struct FileOrganizer<'a> {
    root: PathBuf,
    extension_map: &'a ExtensionMap,
    filters: Option<&'a CompiledFilters>,
    dry_run: bool,
    cancel: Option<CancelFlag>,
    /// Destinations handed out during a dry run, treated as occupied.
    reserved: HashSet<PathBuf>,
    max_conflict_attempts: usize,
}

impl<'a> FileOrganizer<'a> {
    /// Creates an organizer that moves files into folders below `root`.
    ///
    /// A relative `root` is resolved against the current directory.
    pub fn new(root: &Path, extension_map: &'a ExtensionMap) -> Self {
        Self {
            root: std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf()),
            extension_map,
            filters: None,
            dry_run: false,
            cancel: None,
            reserved: HashSet::new(),
            max_conflict_attempts: MAX_CONFLICT_ATTEMPTS,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_max_conflict_attempts(mut self, attempts: usize) -> Self {
        self.max_conflict_attempts = attempts;
        self
    }

    /// Skips files matched by the given exclusion filters.
    pub fn with_filters(mut self, filters: &'a CompiledFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// When set, every decision is made but the filesystem is left untouched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Checks `cancel` before each file.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Processes `files` in order and returns one outcome per processed file.
    ///
    /// If the cancel flag is raised, processing stops before the next file
    /// and the outcomes gathered so far are returned.
    pub fn organize(&mut self, files: &[PathBuf], sink: &mut dyn EventSink) -> Vec<MoveOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());

        for (index, path) in files.iter().enumerate() {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                let remaining = files.len() - index;
                tracing::info!(remaining, "Organization cancelled");
                sink.record(&OrganizeEvent::Cancelled { remaining });
                break;
            }
            outcomes.push(self.organize_file(path, sink));
        }

        outcomes
    }

    /// Classifies and relocates a single file.
    pub fn organize_file(&mut self, path: &Path, sink: &mut dyn EventSink) -> MoveOutcome {
        let Some(candidate) = CandidateFile::from_path(path) else {
            return skip(path, None, SkipReason::NoExtension, sink);
        };

        if candidate.is_hidden() {
            return skip(path, None, SkipReason::Hidden, sink);
        }

        if self
            .filters
            .is_some_and(|filters| filters.is_excluded(&self.root, path))
        {
            return skip(path, None, SkipReason::Excluded, sink);
        }

        if !candidate.has_extension() {
            return skip(path, None, SkipReason::NoExtension, sink);
        }

        let folder = self.extension_map.folder_for(&candidate.extension);
        let destination_dir = self.root.join(&folder);

        if candidate
            .parent()
            .is_some_and(|parent| same_directory(parent, &destination_dir))
        {
            return skip(path, None, SkipReason::AlreadyOrganized, sink);
        }

        match self.place(&candidate, &destination_dir, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "File left in place");
                let destination = match &e {
                    OrganizeError::Move { destination, .. } => Some(destination.clone()),
                    _ => None,
                };
                skip(path, destination, SkipReason::from(&e), sink)
            }
        }
    }

    /// Ensures the destination folder, picks a free name and moves the file.
    fn place(
        &mut self,
        candidate: &CandidateFile,
        destination_dir: &Path,
        sink: &mut dyn EventSink,
    ) -> OrganizeResult<MoveOutcome> {
        self.ensure_directory(destination_dir, sink)?;
        let destination = self.resolve_destination(candidate, destination_dir)?;

        if self.dry_run {
            self.reserved.insert(destination.clone());
            sink.record(&OrganizeEvent::Planned {
                from: candidate.path.clone(),
                to: destination.clone(),
            });
            return Ok(MoveOutcome {
                source: candidate.path.clone(),
                destination: Some(destination),
                status: MoveStatus::Planned,
            });
        }

        relocate(&candidate.path, &destination).map_err(|e| OrganizeError::Move {
            path: candidate.path.clone(),
            destination: destination.clone(),
            cause: e,
        })?;

        tracing::info!(
            from = %candidate.path.display(),
            to = %destination.display(),
            "Moved file"
        );
        sink.record(&OrganizeEvent::Moved {
            from: candidate.path.clone(),
            to: destination.clone(),
        });

        Ok(MoveOutcome {
            source: candidate.path.clone(),
            destination: Some(destination),
            status: MoveStatus::Moved,
        })
    }

    /// Creates the destination folder if it does not exist yet.
    ///
    /// Only the single folder level is created; its parent is always the root.
    fn ensure_directory(&self, path: &Path, sink: &mut dyn EventSink) -> OrganizeResult<()> {
        if path.is_dir() {
            return Ok(());
        }

        if self.dry_run {
            // A real run would fail to create over an existing file.
            if entry_exists(path) {
                return Err(OrganizeError::DirectoryCreate {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
                });
            }
            return Ok(());
        }

        match fs::create_dir(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Created directory");
                sink.record(&OrganizeEvent::DirectoryCreated {
                    path: path.to_path_buf(),
                });
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(OrganizeError::DirectoryCreate {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Picks the first unused name in `destination_dir`: the original name,
    /// then `stem_1.ext`, `stem_2.ext`, ...
    fn resolve_destination(
        &self,
        candidate: &CandidateFile,
        destination_dir: &Path,
    ) -> OrganizeResult<PathBuf> {
        for attempt in 0..=self.max_conflict_attempts {
            let destination = destination_dir.join(candidate.name_for_attempt(attempt));
            if !entry_exists(&destination) && !self.reserved.contains(&destination) {
                return Ok(destination);
            }
        }

        Err(OrganizeError::ConflictResolution {
            directory: destination_dir.to_path_buf(),
            name: candidate.name.clone(),
            attempts: self.max_conflict_attempts,
        })
    }
}

/// Organizes `files` into folders below `root` according to `extension_map`.
///
/// # Examples
///
/// ```no_run
/// use extsort::events::NullSink;
/// use extsort::extension_map::ExtensionMap;
/// use extsort::file_organizer::organize;
/// use std::path::{Path, PathBuf};
///
/// let files = vec![PathBuf::from("/downloads/photo.jpg")];
/// let outcomes = organize(&files, Path::new("/downloads"), &ExtensionMap::default(), &mut NullSink);
/// assert_eq!(outcomes.len(), 1);
/// ```
pub fn organize(
    files: &[PathBuf],
    root: &Path,
    extension_map: &ExtensionMap,
    sink: &mut dyn EventSink,
) -> Vec<MoveOutcome> {
    FileOrganizer::new(root, extension_map).organize(files, sink)
}

fn skip(
    path: &Path,
    destination: Option<PathBuf>,
    reason: SkipReason,
    sink: &mut dyn EventSink,
) -> MoveOutcome {
    tracing::debug!(path = %path.display(), %reason, "Skipped file");
    sink.record(&OrganizeEvent::Skipped {
        path: path.to_path_buf(),
        reason: reason.clone(),
    });
    MoveOutcome {
        source: path.to_path_buf(),
        destination,
        status: MoveStatus::Skipped(reason),
    }
}

/// True if both paths name the same existing directory, however spelled.
fn same_directory(a: &Path, b: &Path) -> bool {
    a == b
        || matches!(
            (fs::canonicalize(a), fs::canonicalize(b)),
            (Ok(a), Ok(b)) if a == b
        )
}

/// Existence check that also sees dangling symlinks, which `rename` would
/// otherwise replace.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Moves `source` to `destination`, falling back to copy and delete when the
/// two are on different devices.
fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                from = %source.display(),
                to = %destination.display(),
                "Rename crosses devices, copying instead"
            );
            copy_then_remove(source, destination, |from: &Path, to: &Path| fs::copy(from, to))
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove<C>(source: &Path, destination: &Path, copy: C) -> io::Result<()>
where
    C: FnOnce(&Path, &Path) -> io::Result<u64>,
{
    let metadata = fs::metadata(source)?;
    if let Err(e) = copy(source, destination) {
        // A partial copy would claim the name on the next run.
        let _ = fs::remove_file(destination);
        return Err(e);
    }

    let restored = filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .and_then(|()| fs::remove_file(source));

    if let Err(e) = restored {
        // Leave exactly one copy behind.
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}
