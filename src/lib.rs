//! Dirmap - map a directory structure with respect to .gitignore rules

pub mod error;
pub mod gitignore;
pub mod mapper;
pub mod output;
pub mod server;
pub mod tree;
pub mod visualize;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{MapError, SerializeError};
pub use gitignore::{IgnoreRule, IgnoreRuleSet};
pub use mapper::{MapOptions, MapOutcome, create_map};
pub use output::{OutputFormat, encode, write_structure};
pub use server::{ServerConfig, serve};
pub use tree::{
    DirectoryEntry, ExcludePatterns, SkippedPath, StructureMap, TreeWalker, WalkOutput, trim,
};
