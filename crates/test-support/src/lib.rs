#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Shared test utilities for the watch-mirror workspace.
//!
//! [`TempTree`] wraps a temporary directory with relative-path helpers so
//! tests can lay out source and destination fixtures without repeating
//! `create_dir_all`/`join` boilerplate.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree that is deleted on drop.
#[derive(Debug)]
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    /// Creates an empty temporary tree.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created; tests cannot
    /// proceed without one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temporary directory"),
        }
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a relative entry within the tree.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Writes a file, creating parent directories as needed.
    ///
    /// # Panics
    ///
    /// Panics on I/O failure; fixture setup must not fail silently.
    pub fn write_file(&self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parents");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Creates a directory (and its parents).
    ///
    /// # Panics
    ///
    /// Panics on I/O failure.
    pub fn create_dir(&self, relative: impl AsRef<Path>) -> PathBuf {
        let path = self.join(relative);
        fs::create_dir_all(&path).expect("create fixture directory");
        path
    }

    /// Reads a file's contents.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn read_file(&self, relative: impl AsRef<Path>) -> Vec<u8> {
        fs::read(self.join(relative)).expect("read fixture file")
    }

    /// Reports whether a relative entry exists.
    #[must_use]
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.join(relative).exists()
    }
}

impl Default for TempTree {
    fn default() -> Self {
        Self::new()
    }
}
