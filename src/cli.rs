//! Command-line interface module for extsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading and mapping overrides
//! - Audit log setup
//! - Organization orchestration and result rendering

use crate::audit::AuditLog;
use crate::config::{ConfigError, OrganizerConfig};
use crate::file_organizer::OrganizeError;
use crate::output::{OutputFormatter, ProgressSink};
use crate::report::OrganizeReport;
use crate::request::{OrganizeRequest, run};
use clap::Parser;
use std::path::PathBuf;

// Exit codes
pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;
pub const NOT_FOUND: i32 = 2;

/// Organize the files of a directory into subfolders named after their extension.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory to organize
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub path: PathBuf,

    /// Also organize files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Show what would be moved without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Map an extension to a folder, overriding the configuration
    #[arg(short, long = "map", value_name = "EXT=FOLDER", value_parser = parse_mapping)]
    pub mappings: Vec<(String, String)>,

    /// Audit log file (default: file_organizer.log in the current directory)
    #[arg(long, value_name = "FILE", conflicts_with = "no_log")]
    pub log_file: Option<PathBuf>,

    /// Do not write an audit log
    #[arg(long)]
    pub no_log: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase diagnostic output (-v info, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Errors that end a CLI run before or instead of organizing.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("Could not serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Organize(OrganizeError::NotFound { .. }) => NOT_FOUND,
            _ => ERROR,
        }
    }
}

/// Parses `EXT=FOLDER`.
fn parse_mapping(value: &str) -> Result<(String, String), String> {
    let (extension, folder) = value
        .split_once('=')
        .ok_or_else(|| format!("expected EXT=FOLDER, got '{}'", value))?;
    let extension = extension.trim().trim_start_matches('.');
    let folder = folder.trim();

    if extension.is_empty() {
        return Err("extension must not be empty".to_string());
    }
    if !crate::extension_map::is_valid_folder_name(folder) {
        return Err(format!("'{}' is not a single folder name", folder));
    }
    Ok((extension.to_string(), folder.to_string()))
}

/// Runs the CLI and returns the process exit code.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use extsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["extsort", "/path/to/directory", "--dry-run"]);
/// std::process::exit(run_cli(&cli));
/// ```
pub fn run_cli(cli: &Cli) -> i32 {
    match organize_with_cli(cli) {
        // Per-file failures are reported, not fatal.
        Ok(_) => SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            e.exit_code()
        }
    }
}

/// Loads configuration, runs the organizer and renders the result.
///
/// Returns the report even when individual files failed; only errors that
/// prevent the run as a whole are returned as `Err`.
pub fn organize_with_cli(cli: &Cli) -> Result<OrganizeReport, CliError> {
    let config = OrganizerConfig::load(cli.config.as_deref())?;
    let mut request = build_request(cli, &config)?;

    let mut audit = if cli.no_log {
        None
    } else {
        let log_path = cli.log_file.clone().unwrap_or_else(|| config.log_file.clone());
        Some(AuditLog::open(log_path)?)
    };

    // Never organize the audit log itself.
    if let Some(log) = &audit
        && let Ok(path) = std::path::absolute(log.path())
    {
        request.filters.exclude_path(path);
    }

    if let Some(log) = audit.as_mut() {
        log.note("Organizer started");
    }

    if !cli.json {
        if cli.dry_run {
            OutputFormatter::dry_run_notice(&format!("Analyzing {}", cli.path.display()));
        } else {
            OutputFormatter::info(&format!("Organizing contents of: {}", cli.path.display()));
        }
    }

    let bar = if cli.json {
        indicatif::ProgressBar::hidden()
    } else {
        OutputFormatter::create_progress_bar()
    };
    let mut progress = ProgressSink::new(bar);

    let result = run(&request, &mut (&mut audit, &mut progress));
    progress.finish();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(log) = audit.as_mut() {
                log.note(&format!("Error during file organization: {}", e));
            }
            return Err(e.into());
        }
    };

    if let Some(log) = audit.as_mut() {
        log.note("Organizer completed");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render(cli, &report);
    }

    Ok(report)
}

/// Builds the request from configuration plus command-line overrides.
pub fn build_request(cli: &Cli, config: &OrganizerConfig) -> Result<OrganizeRequest, CliError> {
    let mut extension_map = config.extension_map()?;
    for (extension, folder) in &cli.mappings {
        extension_map.insert(extension, folder.clone());
    }
    let filters = config.compile_filters()?;

    Ok(OrganizeRequest::new(&cli.path, cli.recursive, extension_map)
        .with_filters(filters)
        .dry_run(cli.dry_run))
}

fn render(cli: &Cli, report: &OrganizeReport) {
    if report.processed() == 0 {
        OutputFormatter::info("No files found to organize.");
        return;
    }

    if cli.verbose > 0 || cli.dry_run {
        OutputFormatter::header(if cli.dry_run { "PLAN" } else { "FILES" });
        for outcome in &report.outcomes {
            OutputFormatter::outcome(&report.root, outcome);
        }
    }

    let total = if cli.dry_run { report.planned } else { report.moved };
    OutputFormatter::summary_table(&report.folders, total);

    if report.skipped > 0 {
        OutputFormatter::info(&format!("{} files left in place.", report.skipped));
    }

    if report.cancelled {
        OutputFormatter::warning("Organization was cancelled before every file was processed.");
    }

    if !report.is_success() {
        OutputFormatter::warning(&format!("{} files could not be organized:", report.failed));
        for outcome in report.failures() {
            OutputFormatter::outcome(&report.root, outcome);
        }
    } else if cli.dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
    } else {
        OutputFormatter::success("Files organized successfully!");
    }
}
