//! Organizer configuration.
//!
//! This module loads the extension-to-folder mapping, the case-sensitivity
//! convention, the audit log location and file exclusion rules from TOML
//! configuration files. Exclusions support:
//! - Exact filename matching
//! - Glob pattern matching against the path relative to the organized root
//! - File extension matching
//! - Regex pattern matching against the file name
//!
//! # Configuration File Format
//!
//! ```toml
//! case_sensitive = true
//! log_file = "file_organizer.log"
//!
//! [folders]
//! jpg = "Images"
//! png = "Images"
//! mp3 = "Music"
//! pdf = "Documents"
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part", "node_modules/**"]
//! extensions = ["tmp"]
//! regex = []
//! ```
//!
//! A `[folders]` table replaces the built-in mapping entirely.

use crate::extension_map::{DEFAULT_FOLDERS, ExtensionMap, is_valid_folder_name};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the audit log when none is configured.
pub const DEFAULT_LOG_FILE: &str = "file_organizer.log";

/// Why a configuration could not be loaded or used.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// The file is not valid TOML or does not match the expected layout.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// A mapping targets something other than a single folder below the root.
    #[error("Invalid folder '{folder}' for extension '{extension}': must be a single folder name")]
    InvalidFolderName { extension: String, folder: String },
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Configuration for an organization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Whether extensions must match mapping keys exactly. Defaults to true.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Where the audit log is appended to.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Extension to destination folder mapping.
    #[serde(default = "default_folders")]
    pub folders: BTreeMap<String, String>,

    /// Rules for leaving files out of organization.
    #[serde(default)]
    pub filters: FilterRules,
}

fn default_case_sensitive() -> bool {
    true
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_folders() -> BTreeMap<String, String> {
    DEFAULT_FOLDERS
        .iter()
        .map(|(ext, folder)| (ext.to_string(), folder.to_string()))
        .collect()
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db", "desktop.ini").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part", "node_modules/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "tmp", "crdownload").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude (for advanced users).
    #[serde(default)]
    pub regex: Vec<String>,
}

impl OrganizerConfig {
    /// Loads the configuration for a run.
    ///
    /// An explicit `config_path` wins. Otherwise the first existing file of
    /// [`OrganizerConfig::search_paths`] is used, and the built-in defaults
    /// when there is none.
    ///
    /// # Errors
    ///
    /// Fails if the chosen file cannot be read or does not parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Implicit configuration locations, most specific first:
    /// `.extsortrc.toml` in the working directory, then
    /// `$HOME/.config/extsort/config.toml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".extsortrc.toml")];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(Path::new(&home).join(".config/extsort/config.toml"));
        }
        paths
    }

    /// Reads and parses one configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::ConfigNotFound(path.to_path_buf()),
            _ => ConfigError::IoError(e.to_string()),
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the extension map described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFolderName` if a folder is not a single path component.
    pub fn extension_map(&self) -> Result<ExtensionMap, ConfigError> {
        let mut map = ExtensionMap::empty().with_case_sensitivity(self.case_sensitive);
        for (extension, folder) in &self.folders {
            if !is_valid_folder_name(folder) {
                return Err(ConfigError::InvalidFolderName {
                    extension: extension.clone(),
                    folder: folder.clone(),
                });
            }
            map.insert(extension, folder.clone());
        }
        Ok(map)
    }

    /// Compile the exclusion rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            log_file: default_log_file(),
            folders: default_folders(),
            filters: FilterRules::default(),
        }
    }
}

/// Compiled exclusion rules.
///
/// Patterns are parsed once up front so matching a file does not reparse them.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    exclude_paths: HashSet<PathBuf>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude = &rules.exclude;
        Ok(Self {
            exclude_filenames: exclude.filenames.iter().cloned().collect(),
            exclude_extensions: exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: exclude
                .patterns
                .iter()
                .map(|p| compile_glob(p))
                .collect::<Result<_, _>>()?,
            exclude_regexes: exclude
                .regex
                .iter()
                .map(|p| compile_regex(p))
                .collect::<Result<_, _>>()?,
            exclude_paths: HashSet::new(),
        })
    }

    /// Always excludes this file, e.g. the audit log itself.
    ///
    /// Matching is by resolved location, so the file is excluded however the
    /// organized root happens to be spelled.
    pub fn exclude_path(&mut self, path: impl Into<PathBuf>) {
        self.exclude_paths.insert(resolve(path.into()));
    }

    /// True if the file below `root` must be left where it is.
    ///
    /// Globs see the path relative to `root`; regexes and file names see the
    /// base name only. Extensions compare case-insensitively.
    pub fn is_excluded(&self, root: &Path, file_path: &Path) -> bool {
        if !self.exclude_paths.is_empty()
            && self.exclude_paths.contains(&resolve(file_path.to_path_buf()))
        {
            return true;
        }

        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let extension = file_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        let relative = file_path.strip_prefix(root).unwrap_or(file_path);

        self.exclude_filenames.contains(name.as_ref())
            || extension.is_some_and(|e| self.exclude_extensions.contains(&e))
            || self.exclude_patterns.iter().any(|p| p.matches_path(relative))
            || self.exclude_regexes.iter().any(|r| r.is_match(&name))
    }

    /// Returns true if no rule can ever match.
    pub fn is_empty(&self) -> bool {
        self.exclude_filenames.is_empty()
            && self.exclude_extensions.is_empty()
            && self.exclude_patterns.is_empty()
            && self.exclude_regexes.is_empty()
            && self.exclude_paths.is_empty()
    }
}

/// Resolves `..` and symlinks when the path exists.
fn resolve(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

fn compile_glob(pattern: &str) -> Result<Pattern, ConfigError> {
    Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.to_string()))
}

fn compile_regex(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
