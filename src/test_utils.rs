//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create an (empty) directory and its parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Populate `dirs` directories with `files_per_dir` files each, plus
    /// ignored `target/` and `*.log` noise.
    pub fn populate(&self, dirs: usize, files_per_dir: usize) {
        self.add_file(".gitignore", "target/\n*.log\n");
        for d in 0..dirs {
            for f in 0..files_per_dir {
                self.add_file(&format!("pkg_{}/src/file_{}.rs", d, f), "");
            }
            self.add_file(&format!("pkg_{}/debug.log", d), "");
            self.add_file(&format!("pkg_{}/target/out.bin", d), "");
        }
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
