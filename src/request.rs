//! Single entry point for an organization run: validate the root, enumerate,
//! organize, report.

use crate::config::CompiledFilters;
use crate::enumerator::enumerate;
use crate::events::{EventSink, OrganizeEvent};
use crate::extension_map::ExtensionMap;
use crate::file_organizer::{CancelFlag, FileOrganizer, OrganizeError, OrganizeResult};
use crate::report::OrganizeReport;
use std::path::PathBuf;

/// Everything one run needs. Not modified while the run is in progress.
#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    /// Directory whose files are organized.
    pub root: PathBuf,
    /// Also organize files in nested directories.
    pub recurse: bool,
    pub extension_map: ExtensionMap,
    pub filters: CompiledFilters,
    /// Decide everything but move nothing.
    pub dry_run: bool,
    pub cancel: Option<CancelFlag>,
}

impl OrganizeRequest {
    pub fn new(root: impl Into<PathBuf>, recurse: bool, extension_map: ExtensionMap) -> Self {
        Self {
            root: root.into(),
            recurse,
            extension_map,
            filters: CompiledFilters::default(),
            dry_run: false,
            cancel: None,
        }
    }

    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Runs a request to completion.
///
/// # Errors
///
/// Returns [`OrganizeError::NotFound`] if the root is missing or not a
/// directory; nothing is touched in that case. Every other problem is limited
/// to a single file and recorded in the report.
///
/// # Examples
///
/// ```no_run
/// use extsort::events::NullSink;
/// use extsort::extension_map::ExtensionMap;
/// use extsort::request::{OrganizeRequest, run};
///
/// let request = OrganizeRequest::new("/home/user/Downloads", false, ExtensionMap::default());
/// match run(&request, &mut NullSink) {
///     Ok(report) => println!("Moved {} files", report.moved),
///     Err(e) => eprintln!("Organization failed: {}", e),
/// }
/// ```
pub fn run(request: &OrganizeRequest, sink: &mut dyn EventSink) -> OrganizeResult<OrganizeReport> {
    let root = std::path::absolute(&request.root).map_err(|_| OrganizeError::NotFound {
        path: request.root.clone(),
    })?;
    if !root.is_dir() {
        return Err(OrganizeError::NotFound { path: root });
    }

    let files = enumerate(&root, request.recurse)?;
    tracing::info!(
        root = %root.display(),
        files = files.len(),
        recurse = request.recurse,
        dry_run = request.dry_run,
        "Organizing directory"
    );
    sink.record(&OrganizeEvent::Started {
        root: root.clone(),
        files: files.len(),
    });

    let mut organizer = FileOrganizer::new(&root, &request.extension_map)
        .with_filters(&request.filters)
        .dry_run(request.dry_run);
    if let Some(cancel) = &request.cancel {
        organizer = organizer.with_cancel_flag(cancel.clone());
    }
    let outcomes = organizer.organize(&files, sink);

    let mut report = OrganizeReport::from_outcomes(&root, outcomes);
    report.cancelled = report.processed() < files.len();
    sink.record(&OrganizeEvent::Finished {
        moved: report.moved,
        skipped: report.skipped,
    });

    Ok(report)
}
