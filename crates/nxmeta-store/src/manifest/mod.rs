//! Batch manifests
//!
//! Provides:
//! - The YAML manifest schema
//! - A parser that validates entries and resolves relative paths

pub mod format;
pub mod parser;

pub use format::{BatchManifest, ManifestPair};
pub use parser::{parse_manifest_file, parse_manifest_str};
