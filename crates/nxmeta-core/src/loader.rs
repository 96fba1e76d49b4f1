//! Byte loading seam
//!
//! The core never touches the filesystem itself. Callers inject a
//! [`ByteLoader`]; `nxmeta-store` provides the filesystem implementation.

use crate::errors::{ExError, ExErrorKind, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Source of raw input bytes
pub trait ByteLoader {
    /// Load the whole input at `path`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `path`
    /// - `Io` for any other read failure
    fn load(&self, path: &Path) -> Result<Vec<u8>>;
}

/// In-memory loader keyed by path
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) -> &mut Self {
        self.files.insert(path.into(), bytes);
        self
    }
}

impl ByteLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_op("load")
                .with_path(path.display().to_string())
                .with_message("no such input")
        })
    }
}
