//! nxmeta core: parsing and semantic diffing of program metadata
//!
//! This crate provides:
//! - A bitcount-dispatched decoder for kernel capability descriptors
//! - Bounds-checked parsers for META (ACID/ACI0 with FAC, SAC, KC) and
//!   INI1/KIP1 containers
//! - A trust bundle parser with pluggable certificate summaries
//! - A structural diff engine producing sparse, deterministic change-sets
//! - A batch driver over injected byte loaders
//!
//! Parsing and diffing are pure functions of in-memory buffers. Logging goes
//! through `tracing` at the outer operations only.

pub mod batch;
pub mod caps;
pub mod container;
pub mod diagnostics;
pub mod diff;
pub mod document;
pub mod errors;
pub mod loader;
pub mod logging_facility;
pub mod reader;
mod serde_hex;
pub mod trust;

pub use nxmeta_core_types::schema;

// Re-export commonly used types
pub use batch::{run_batch, BatchReport, DiffPair};
pub use caps::KernelCapabilities;
pub use container::{parse, Container};
pub use diagnostics::{Diagnostic, DiagnosticSink, IgnoreSink, TracingSink};
pub use diff::{diff, ChangeSet};
pub use document::{diff_documents, load_document, parse_document, Document};
pub use errors::{ExError, ExErrorKind, ParseError, Result};
pub use loader::{ByteLoader, MemoryLoader};
