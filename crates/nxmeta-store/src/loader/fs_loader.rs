//! Filesystem-based byte loader
//!
//! Reads whole files for the core parsers. Relative paths are resolved
//! against an optional root directory.

use crate::errors::{io_error, Result};
use nxmeta_core::ByteLoader;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem implementation of [`ByteLoader`]
#[derive(Debug, Default, Clone)]
pub struct FsLoader {
    root: Option<PathBuf>,
}

impl FsLoader {
    /// Loader that reads paths as given (relative to the working directory)
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that resolves relative paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Path that will actually be read for `path`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ByteLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let resolved = self.resolve(path);
        let bytes = fs::read(&resolved).map_err(|e| io_error("load", &resolved, e))?;
        tracing::debug!(
            component = module_path!(),
            op = "load",
            path = %resolved.display(),
            size = bytes.len(),
            "Read input"
        );
        Ok(bytes)
    }
}
