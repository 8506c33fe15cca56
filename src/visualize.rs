//! Visualization page export

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MapError;

/// The visualization page, embedded at build time.
pub const VISUALIZE_HTML: &str = include_str!("../assets/visualize.html");

/// File name of the page written next to `structure.json`.
pub const VISUALIZE_FILE_NAME: &str = "dirmap_visualize.html";

/// Write the visualization page into `dir`.
pub fn install(dir: &Path) -> Result<PathBuf, MapError> {
    let path = dir.join(VISUALIZE_FILE_NAME);
    fs::write(&path, VISUALIZE_HTML).map_err(|source| MapError::Visualization {
        path: path.clone(),
        source,
    })?;
    tracing::info!("Visualization interface copied to {}", path.display());
    Ok(path)
}

/// Open a file path or URL in the default browser. Failure is only logged.
pub fn open_in_browser(target: &str) {
    tracing::info!("Opening visualization in browser: {}", target);
    if let Err(e) = open::that(target) {
        tracing::warn!("Failed to open browser for {}: {}", target, e);
    }
}

/// `file://` URL for a local page.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
