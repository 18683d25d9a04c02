//! Progress events emitted while organizing.
//!
//! The organizer reports every action it takes to an [`EventSink`] passed in by
//! the caller, in processing order. Sinks decide what to do with them: write an
//! audit log, drive a progress bar, or simply collect them.

use crate::file_organizer::SkipReason;
use std::fmt;
use std::path::PathBuf;

/// A discrete, observable action taken during an organization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeEvent {
    /// Enumeration finished and organizing is about to begin.
    Started { root: PathBuf, files: usize },
    /// A file was left in place.
    Skipped { path: PathBuf, reason: SkipReason },
    /// A destination folder was created.
    DirectoryCreated { path: PathBuf },
    /// A file was relocated.
    Moved { from: PathBuf, to: PathBuf },
    /// A dry run decided where a file would go.
    Planned { from: PathBuf, to: PathBuf },
    /// The run stopped early with `remaining` files left unprocessed.
    Cancelled { remaining: usize },
    /// Every file has been processed.
    Finished { moved: usize, skipped: usize },
}

impl fmt::Display for OrganizeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { root, files } => {
                write!(f, "Organizing {} ({} files)", root.display(), files)
            }
            Self::Skipped { path, reason } => write!(f, "Skipped {}: {}", path.display(), reason),
            Self::DirectoryCreated { path } => write!(f, "Created directory: {}", path.display()),
            Self::Moved { from, to } => write!(f, "Moved {} to {}", from.display(), to.display()),
            Self::Planned { from, to } => {
                write!(f, "Would move {} to {}", from.display(), to.display())
            }
            Self::Cancelled { remaining } => {
                write!(f, "Cancelled with {} files remaining", remaining)
            }
            Self::Finished { moved, skipped } => {
                write!(f, "Organization completed: {} moved, {} skipped", moved, skipped)
            }
        }
    }
}

/// Receives organization events as they happen.
pub trait EventSink {
    fn record(&mut self, event: &OrganizeEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &OrganizeEvent) {}
}

impl EventSink for Vec<OrganizeEvent> {
    fn record(&mut self, event: &OrganizeEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &OrganizeEvent) {
        (**self).record(event);
    }
}

impl<S: EventSink> EventSink for Option<S> {
    fn record(&mut self, event: &OrganizeEvent) {
        if let Some(sink) = self {
            sink.record(event);
        }
    }
}

/// Fans each event out to both sinks, first `A` then `B`.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn record(&mut self, event: &OrganizeEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}
