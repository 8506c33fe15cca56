//! Error types for mapping, encoding and serving

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::output::OutputFormat;

/// Errors reported to the caller of the mapping pipeline.
///
/// Malformed ignore rules and unreadable subdirectories are not errors: they are
/// logged and collected as diagnostics while the walk continues.
#[derive(Debug, Error)]
pub enum MapError {
    /// The format name is not one of `json`, `yaml`, `xml`.
    #[error("invalid output format '{0}' (expected json, yaml or xml)")]
    UnknownFormat(String),

    /// The directory to map does not exist or cannot be listed.
    #[error("cannot access '{}': {source}", path.display())]
    RootUnreadable { path: PathBuf, source: io::Error },

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The ignore file exists but could not be read.
    #[error("failed to read ignore rules from '{}': {source}", path.display())]
    IgnoreSource { path: PathBuf, source: io::Error },

    #[error("failed to encode structure as {format}: {source}")]
    Serialize {
        format: OutputFormat,
        source: SerializeError,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The visualization page could not be written next to the structure file.
    #[error("failed to set up visualization at '{}': {source}", path.display())]
    Visualization { path: PathBuf, source: io::Error },

    #[error("server error: {0}")]
    Server(#[source] io::Error),
}

/// Failure of a single format encoder.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Xml(String),
}
