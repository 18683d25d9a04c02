//! extsort - organize a directory by file extension
//!
//! This library enumerates the files of a directory (optionally recursively),
//! classifies each one by its extension through a configurable
//! extension-to-folder mapping, and moves it into the matching subfolder with
//! conflict-safe renaming. Every action is reported to a caller-supplied event
//! sink such as the append-only [`audit::AuditLog`].

pub mod audit;
pub mod candidate;
pub mod cli;
pub mod config;
pub mod enumerator;
pub mod events;
pub mod extension_map;
pub mod file_organizer;
pub mod output;
pub mod report;
pub mod request;

pub use audit::AuditLog;
pub use candidate::CandidateFile;
pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use enumerator::enumerate;
pub use events::{EventSink, NullSink, OrganizeEvent};
pub use extension_map::ExtensionMap;
pub use file_organizer::{
    CancelFlag, FileOrganizer, MoveOutcome, MoveStatus, OrganizeError, OrganizeResult, SkipReason,
    organize,
};
pub use report::OrganizeReport;
pub use request::{OrganizeRequest, run};

pub use cli::{Cli, run_cli};
