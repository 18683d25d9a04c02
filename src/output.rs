//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! the progress bar driven by organizer events, and the per-folder summary table.

use crate::events::{EventSink, OrganizeEvent};
use crate::file_organizer::{MoveOutcome, MoveStatus};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    /// OutputFormatter::success("Files organized successfully!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints one line describing what happened to a file, relative to `root`.
    pub fn outcome(root: &Path, outcome: &MoveOutcome) {
        let source = relative(root, &outcome.source);
        let destination = outcome
            .destination
            .as_deref()
            .map(|d| relative(root, d))
            .unwrap_or_default();

        match &outcome.status {
            MoveStatus::Moved => println!(" {} {} → {}", "✓".green(), source, destination),
            MoveStatus::Planned => println!(" {} {} → {}", "→".yellow(), source, destination),
            MoveStatus::Skipped(reason) if reason.is_failure() => {
                println!(" {} {} ({})", "✗".red(), source, reason)
            }
            MoveStatus::Skipped(reason) => {
                println!(" {} {} ({})", "-".dimmed(), source, reason.to_string().dimmed())
            }
        }
    }

    /// Creates a progress bar for the files of a run.
    ///
    /// The length is set once the organizer reports how many files it found.
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a summary table with file counts per destination folder.
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_folder_len = folder_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // At least "Folder" width

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_folder_len
        );
    }
}

/// Advances a progress bar as files are processed.
pub struct ProgressSink {
    bar: ProgressBar,
}

impl ProgressSink {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl EventSink for ProgressSink {
    fn record(&mut self, event: &OrganizeEvent) {
        match event {
            OrganizeEvent::Started { files, .. } => self.bar.set_length(*files as u64),
            OrganizeEvent::Moved { from, .. }
            | OrganizeEvent::Planned { from, .. }
            | OrganizeEvent::Skipped { path: from, .. } => {
                if let Some(name) = from.file_name() {
                    self.bar.set_message(name.to_string_lossy().into_owned());
                }
                self.bar.inc(1);
            }
            OrganizeEvent::DirectoryCreated { .. }
            | OrganizeEvent::Cancelled { .. }
            | OrganizeEvent::Finished { .. } => {}
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_progress_sink_counts_processed_files() {
        let bar = ProgressBar::hidden();
        let mut sink = ProgressSink::new(bar.clone());

        sink.record(&OrganizeEvent::Started {
            root: PathBuf::from("/data"),
            files: 3,
        });
        sink.record(&OrganizeEvent::DirectoryCreated {
            path: PathBuf::from("/data/Images"),
        });
        sink.record(&OrganizeEvent::Moved {
            from: PathBuf::from("/data/a.jpg"),
            to: PathBuf::from("/data/Images/a.jpg"),
        });

        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 1);
    }

    #[test]
    fn test_relative_display() {
        assert_eq!(
            relative(Path::new("/data"), Path::new("/data/Images/a.jpg")),
            PathBuf::from("Images/a.jpg").display().to_string()
        );
        assert_eq!(relative(Path::new("/data"), Path::new("/else/a.jpg")), "/else/a.jpg");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "file");
        assert_eq!(plural(0), "files");
        assert_eq!(plural(2), "files");
    }
}
