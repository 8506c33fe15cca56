//! Structure serialization
//!
//! This module encodes a [`StructureMap`] in one of the supported formats and
//! writes it next to the mapped directory:
//! - `json` - pretty-printed object keyed by path
//! - `yaml` - the same mapping in block style
//! - `xml` - a `structure` document with one `directory` element per entry

mod json;
mod xml;
mod yaml;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use tempfile::NamedTempFile;

use crate::error::{MapError, SerializeError};
use crate::tree::StructureMap;

/// Base name of the output file; the format supplies the extension.
pub const STRUCTURE_FILE_STEM: &str = "structure";

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Xml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Xml => "xml",
        }
    }

    /// `structure.<ext>`
    pub fn file_name(self) -> String {
        format!("{}.{}", STRUCTURE_FILE_STEM, self.extension())
    }

    fn label(self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Yaml => "YAML",
            OutputFormat::Xml => "XML",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(MapError::UnknownFormat(s.to_string())),
        }
    }
}

/// Encode the structure in memory.
pub fn encode(structure: &StructureMap, format: OutputFormat) -> Result<Vec<u8>, SerializeError> {
    match format {
        OutputFormat::Json => Ok(json::encode(structure)?),
        OutputFormat::Yaml => Ok(yaml::encode(structure)?),
        OutputFormat::Xml => xml::encode(structure),
    }
}

/// Encode the structure and write it to `<dir>/structure.<ext>`.
///
/// The document is staged in a temporary file in `dir` and renamed into place,
/// so a failed call never leaves a truncated output file behind.
pub fn write_structure(
    dir: &Path,
    structure: &StructureMap,
    format: OutputFormat,
) -> Result<PathBuf, MapError> {
    let path = dir.join(format.file_name());
    let bytes = encode(structure, format).map_err(|source| MapError::Serialize { format, source })?;

    let write_error = |source: std::io::Error| MapError::Write {
        path: path.clone(),
        source,
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
    staged.write_all(&bytes).map_err(write_error)?;
    staged.flush().map_err(write_error)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_error)?;
    }
    staged.persist(&path).map_err(|e| write_error(e.error))?;

    tracing::info!("Saved structure as {} at {}", format.label(), path.display());
    Ok(path)
}
