//! TreeWalker - builds the structure map for a directory

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MapError;
use crate::gitignore::IgnoreRuleSet;

use super::structure::{DirectoryEntry, StructureMap};

/// A path the walk could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a walk: the structure map plus every path that had to be skipped.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub structure: StructureMap,
    pub skipped: Vec<SkippedPath>,
}

/// Pre-order directory walker filtering entries through an [`IgnoreRuleSet`].
///
/// Ignored directories are pruned without being read. Symlinks are listed
/// according to their target but never descended into.
pub struct TreeWalker<'a> {
    rules: &'a IgnoreRuleSet,
}

impl<'a> TreeWalker<'a> {
    pub fn new(rules: &'a IgnoreRuleSet) -> Self {
        Self { rules }
    }

    /// Walk `root`, which should be absolute since it becomes the key prefix.
    pub fn walk(&self, root: &Path) -> Result<WalkOutput, MapError> {
        let metadata = fs::metadata(root).map_err(|source| MapError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(MapError::NotADirectory(root.to_path_buf()));
        }
        // Fail fast on an unlistable root rather than reporting it as skipped.
        fs::read_dir(root).map_err(|source| MapError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut output = WalkOutput::default();
        self.walk_dir(root, &root_relative(), &mut output);
        Ok(output)
    }

    fn walk_dir(&self, path: &Path, relative: &Path, output: &mut WalkOutput) {
        tracing::debug!("Scanning directory: {}", path.display());

        let entries = match fs::read_dir(path) {
            Ok(e) => e,
            Err(e) => {
                skip(output, path, e.to_string());
                return;
            }
        };

        let mut entry = DirectoryEntry::default();
        let mut descend = Vec::new();

        for dir_entry in entries {
            let dir_entry = match dir_entry {
                Ok(d) => d,
                Err(e) => {
                    skip(output, path, e.to_string());
                    continue;
                }
            };
            let name = dir_entry.file_name();
            let entry_path = dir_entry.path();
            let child_relative = child_relative(relative, &name);

            let is_symlink = dir_entry
                .file_type()
                .map(|t| t.is_symlink())
                .unwrap_or(false);
            let is_dir = entry_path.is_dir();

            if self.rules.matches_entry(&child_relative, is_dir) {
                continue;
            }

            let name = name.to_string_lossy().into_owned();
            if is_dir {
                entry.dirs.insert(name);
                if !is_symlink {
                    descend.push((entry_path, child_relative));
                }
            } else {
                entry.files.insert(name);
            }
        }

        if !entry.is_empty() {
            tracing::debug!(
                "Added to structure: {} with {} files and {} directories",
                path.display(),
                entry.files.len(),
                entry.dirs.len()
            );
            output
                .structure
                .insert(path.to_string_lossy().into_owned(), entry);
        }

        for (child, child_relative) in descend {
            self.walk_dir(&child, &child_relative, output);
        }
    }
}

/// The root's own path relative to itself: empty, never `"."`.
fn root_relative() -> PathBuf {
    PathBuf::new()
}

fn child_relative(parent: &Path, name: &OsStr) -> PathBuf {
    if parent.as_os_str().is_empty() {
        PathBuf::from(name)
    } else {
        parent.join(name)
    }
}

fn skip(output: &mut WalkOutput, path: &Path, reason: String) {
    tracing::warn!("Skipping {}: {}", path.display(), reason);
    output.skipped.push(SkippedPath {
        path: path.to_path_buf(),
        reason,
    });
}
