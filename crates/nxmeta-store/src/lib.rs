//! nxmeta store: filesystem access for the core
//!
//! Provides:
//! - `FsLoader`, the filesystem implementation of the core's `ByteLoader`
//! - Batch manifest (YAML) parsing with paths resolved against the manifest
//! - Store-level error helpers mapping `std::io` failures onto `ExError`

pub mod errors;
pub mod loader;
pub mod manifest;

// Re-export key types
pub use errors::Result;
pub use loader::FsLoader;
pub use manifest::{parse_manifest_file, parse_manifest_str, BatchManifest};
