//! Substring-based trimming of a structure map

use super::structure::{DirectoryEntry, StructureMap};

/// Substrings removed by `--trim` when no explicit patterns are given.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    ".git",
    "venv",
    "__pycache__",
    ".egg-info",
    "dist",
    "build",
    "site-packages",
    ".ipynb_checkpoints",
];

/// Plain substrings (not globs) excluded by [`trim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludePatterns(Vec<String>);

impl ExcludePatterns {
    pub fn new<I>(patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    pub fn defaults() -> Self {
        Self::new(DEFAULT_EXCLUDE_PATTERNS.iter().copied())
    }

    /// True if `text` contains any pattern as a substring.
    pub fn excludes(&self, text: &str) -> bool {
        self.0.iter().any(|pattern| text.contains(pattern.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for ExcludePatterns {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Remove entries whose path contains a pattern, and child-directory names
/// containing a pattern. File sets are left untouched.
///
/// Entries and listings are filtered independently: a child entry dropped for
/// its path can still be listed by its parent when the pattern only matches
/// across the separator, not within the child's name.
pub fn trim(structure: StructureMap, patterns: &ExcludePatterns) -> StructureMap {
    let original = structure.len();

    let trimmed: StructureMap = structure
        .into_iter()
        .filter(|(path, _)| !patterns.excludes(path))
        .map(|(path, entry)| {
            let DirectoryEntry { files, dirs } = entry;
            let dirs = dirs.into_iter().filter(|d| !patterns.excludes(d)).collect();
            (path, DirectoryEntry { files, dirs })
        })
        .collect();

    tracing::info!("Original structure had {} directories", original);
    tracing::info!("Trimmed structure has {} directories", trimmed.len());

    trimmed
}
