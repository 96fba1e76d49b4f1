//! Container parsers for META and INI1 files.
//!
//! [`parse`] routes on the 4-byte magic at offset 0. Every nested
//! offset/size pair is validated against its parent before slicing, and any
//! structural failure aborts the whole parse.

pub mod fac;
pub mod ini1;
pub mod meta;
pub mod sac;

use crate::diagnostics::DiagnosticSink;
use crate::errors::ParseError;
use crate::reader::BlockReader;
use serde::{Deserialize, Serialize};

pub use ini1::{InitialProcess, InitialProcessContainer};
pub use meta::MetaContainer;

/// "META"
pub const META_MAGIC: u32 = 0x4154_454D;
/// "INI1"
pub const INI1_MAGIC: u32 = 0x3149_4E49;
/// "ACID"
pub const ACID_MAGIC: u32 = 0x4449_4341;
/// "ACI0"
pub const ACI0_MAGIC: u32 = 0x3049_4341;
/// "KIP1"
pub const KIP1_MAGIC: u32 = 0x3150_494B;

/// A parsed program metadata file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    Meta(MetaContainer),
    InitialProcess(InitialProcessContainer),
}

impl Container {
    pub fn format(&self) -> &'static str {
        match self {
            Container::Meta(_) => "META",
            Container::InitialProcess(_) => "INI1",
        }
    }
}

/// Read the little-endian magic at offset 0
///
/// # Errors
///
/// Returns `MissingMagic` when the input is shorter than 4 bytes.
pub fn read_magic(bytes: &[u8]) -> Result<u32, ParseError> {
    BlockReader::new("magic", bytes)
        .u32(0)
        .map_err(|_| ParseError::MissingMagic { len: bytes.len() })
}

/// Parse a META or INI1 file.
///
/// Non-fatal findings from the KC decoder go to `sink`.
///
/// # Errors
///
/// - `UnrecognizedFormat` / `MissingMagic` for any other magic
/// - any structural error from the META or INI1 parser
pub fn parse(bytes: &[u8], sink: &mut dyn DiagnosticSink) -> Result<Container, ParseError> {
    match read_magic(bytes)? {
        META_MAGIC => meta::parse(bytes, sink).map(Container::Meta),
        INI1_MAGIC => ini1::parse(bytes, sink).map(Container::InitialProcess),
        magic => Err(ParseError::UnrecognizedFormat { magic }),
    }
}
