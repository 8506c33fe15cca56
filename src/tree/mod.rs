//! Directory structure mapping
//!
//! - `walker` - gitignore-aware walk producing a [`StructureMap`]
//! - `structure` - the map and its per-directory entries
//! - `trim` - substring-based pruning applied after the walk

mod structure;
mod trim;
mod walker;

pub use structure::{DirectoryEntry, StructureMap};
pub use trim::{DEFAULT_EXCLUDE_PATTERNS, ExcludePatterns, trim};
pub use walker::{SkippedPath, TreeWalker, WalkOutput};
