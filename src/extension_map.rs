/// Extension-to-folder mapping used to classify files.
///
/// Keys are extension strings without the leading dot, values are the name of the
/// subfolder (a direct child of the organized root) the file is moved into.
/// Extensions with no entry fall back to a folder named after the extension itself.
///
/// # Examples
///
/// ```
/// use extsort::extension_map::ExtensionMap;
///
/// let map = ExtensionMap::default();
/// assert_eq!(map.folder_for("jpg"), "Images");
/// assert_eq!(map.folder_for("mp3"), "Music");
/// assert_eq!(map.folder_for("txt"), "txt");
/// ```
use std::collections::BTreeMap;

/// Mappings applied when no configuration overrides them.
pub const DEFAULT_FOLDERS: &[(&str, &str)] = &[
    ("jpg", "Images"),
    ("png", "Images"),
    ("mp3", "Music"),
    ("pdf", "Documents"),
];

/// Maps file extensions to destination folder names.
///
/// Matching is case-sensitive unless the map is switched to case-insensitive
/// mode, in which case keys and looked-up extensions are both lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMap {
    folders: BTreeMap<String, String>,
    case_sensitive: bool,
}

impl ExtensionMap {
    /// Creates a case-sensitive map pre-populated with [`DEFAULT_FOLDERS`].
    pub fn new() -> Self {
        DEFAULT_FOLDERS
            .iter()
            .map(|(ext, folder)| (ext.to_string(), folder.to_string()))
            .collect()
    }

    /// Creates a case-sensitive map with no entries, so every extension
    /// falls back to its own name.
    pub fn empty() -> Self {
        Self {
            folders: BTreeMap::new(),
            case_sensitive: true,
        }
    }

    /// Switches the case-sensitivity convention, re-keying existing entries.
    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        let folders = std::mem::take(&mut self.folders);
        for (ext, folder) in folders {
            self.insert(&ext, folder);
        }
        self
    }

    /// Returns true when extensions are compared exactly.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Adds or replaces a mapping, returning the folder previously mapped to
    /// that extension.
    ///
    /// A leading `.` on the extension is ignored.
    pub fn insert(&mut self, extension: &str, folder: impl Into<String>) -> Option<String> {
        let key = self.normalize(extension.trim_start_matches('.'));
        self.folders.insert(key, folder.into())
    }

    /// Returns the folder explicitly mapped to `extension`, if any.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.folders
            .get(&self.normalize(extension))
            .map(String::as_str)
    }

    /// Resolves the destination folder name for an extension.
    ///
    /// Unmapped extensions are organized into a folder named after the
    /// (normalized) extension.
    pub fn folder_for(&self, extension: &str) -> String {
        self.lookup(extension)
            .map(str::to_string)
            .unwrap_or_else(|| self.normalize(extension))
    }

    /// Iterates mappings in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    fn normalize(&self, extension: &str) -> String {
        if self.case_sensitive {
            extension.to_string()
        } else {
            extension.to_lowercase()
        }
    }
}

impl Default for ExtensionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, String)> for ExtensionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::empty();
        for (ext, folder) in iter {
            map.insert(&ext, folder);
        }
        map
    }
}

/// Returns true if `folder` can be used as a single-level destination folder
/// name directly below the organized root.
pub fn is_valid_folder_name(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\'])
        && !folder.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mappings() {
        let map = ExtensionMap::default();
        assert_eq!(map.lookup("jpg"), Some("Images"));
        assert_eq!(map.lookup("png"), Some("Images"));
        assert_eq!(map.lookup("mp3"), Some("Music"));
        assert_eq!(map.lookup("pdf"), Some("Documents"));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_unmapped_extension_falls_back_to_itself() {
        let map = ExtensionMap::default();
        assert_eq!(map.lookup("txt"), None);
        assert_eq!(map.folder_for("txt"), "txt");
        assert_eq!(map.folder_for("tar"), "tar");
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let map = ExtensionMap::default();
        assert!(map.is_case_sensitive());
        assert_eq!(map.lookup("JPG"), None);
        assert_eq!(map.folder_for("JPG"), "JPG");
    }

    #[test]
    fn test_case_insensitive_matching() {
        let mut map = ExtensionMap::empty().with_case_sensitivity(false);
        map.insert("JPEG", "Images");

        assert_eq!(map.lookup("jpeg"), Some("Images"));
        assert_eq!(map.lookup("JpEg"), Some("Images"));
        // Fallback folders are normalized too, so FOO and foo share a folder
        assert_eq!(map.folder_for("TXT"), "txt");
    }

    #[test]
    fn test_switching_case_sensitivity_rekeys_entries() {
        let mut map = ExtensionMap::empty();
        map.insert("MOV", "Videos");
        let map = map.with_case_sensitivity(false);

        assert_eq!(map.lookup("mov"), Some("Videos"));
    }

    #[test]
    fn test_insert_strips_leading_dot() {
        let mut map = ExtensionMap::empty();
        assert_eq!(map.insert(".flac", "Music"), None);
        assert_eq!(map.lookup("flac"), Some("Music"));
        assert_eq!(map.insert("flac", "Lossless"), Some("Music".to_string()));
    }

    #[test]
    fn test_multiple_extensions_share_a_folder() {
        let map: ExtensionMap = [
            ("gif".to_string(), "Images".to_string()),
            ("webp".to_string(), "Images".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.folder_for("gif"), map.folder_for("webp"));
        assert_eq!(map.iter().count(), 2);
    }

    #[test]
    fn test_folder_name_validation() {
        assert!(is_valid_folder_name("Images"));
        assert!(is_valid_folder_name("My Music"));
        assert!(!is_valid_folder_name(""));
        assert!(!is_valid_folder_name("."));
        assert!(!is_valid_folder_name(".."));
        assert!(!is_valid_folder_name("a/b"));
        assert!(!is_valid_folder_name("a\\b"));
    }
}
