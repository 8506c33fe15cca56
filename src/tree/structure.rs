//! In-memory structure map produced by the walk

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Surviving immediate children of one directory, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub files: BTreeSet<String>,
    pub dirs: BTreeSet<String>,
}

impl DirectoryEntry {
    pub fn new<F, D>(files: F, dirs: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Directory entries keyed by absolute directory path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureMap(BTreeMap<String, DirectoryEntry>);

impl StructureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, entry: DirectoryEntry) {
        self.0.insert(path.into(), entry);
    }

    pub fn get(&self, path: &str) -> Option<&DirectoryEntry> {
        self.0.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, DirectoryEntry> {
        self.0.iter()
    }
}

impl IntoIterator for StructureMap {
    type Item = (String, DirectoryEntry);
    type IntoIter = btree_map::IntoIter<String, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StructureMap {
    type Item = (&'a String, &'a DirectoryEntry);
    type IntoIter = btree_map::Iter<'a, String, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, DirectoryEntry)> for StructureMap {
    fn from_iter<T: IntoIterator<Item = (String, DirectoryEntry)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
