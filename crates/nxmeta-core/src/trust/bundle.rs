//! Trust bundle layout: a count-prefixed table of `{id, status, size, offset}`
//! records followed by their payloads.

use super::certificate::{CertificateDecoder, CertificateSummary};
use crate::errors::ParseError;
use crate::reader::BlockReader;
use serde::{Deserialize, Serialize};

/// "sslT"
pub const TRUST_BUNDLE_MAGIC: u32 = 0x546C_7373;
const HEADER_SIZE: usize = 0x8;
const ENTRY_SIZE: usize = 0x10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustBundleEntry {
    pub id: u32,
    pub status: u32,
    pub data_size: u32,
    pub data_offset: u32,
    #[serde(with = "crate::serde_hex")]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustBundle {
    pub entries: Vec<TrustBundleEntry>,
}

impl TrustBundle {
    pub fn entry(&self, id: u32) -> Option<&TrustBundleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

/// Parse a trust bundle, summarizing each payload through `certificates`.
///
/// Payload offsets are relative to the end of the 8-byte header.
///
/// # Errors
///
/// - `UnrecognizedFormat` if the magic is wrong
/// - `Truncated` if the entry table or a payload runs past the input
pub fn parse(
    bytes: &[u8],
    certificates: &dyn CertificateDecoder,
) -> Result<TrustBundle, ParseError> {
    let file = BlockReader::new("TrustBundle", bytes);
    let magic = file.u32(0x0)?;
    if magic != TRUST_BUNDLE_MAGIC {
        return Err(ParseError::UnrecognizedFormat { magic });
    }
    let entry_count = file.u32(0x4)?;

    let mut entries = Vec::new();
    for index in 0..entry_count as usize {
        let pos = HEADER_SIZE + index * ENTRY_SIZE;
        let id = file.u32(pos)?;
        let status = file.u32(pos + 0x4)?;
        let data_size = file.u32(pos + 0x8)?;
        let data_offset = file.u32(pos + 0xC)?;
        let data = file
            .bytes(HEADER_SIZE + data_offset as usize, data_size as usize)?
            .to_vec();
        let certificate = certificates.decode(&data);
        entries.push(TrustBundleEntry {
            id,
            status,
            data_size,
            data_offset,
            data,
            certificate,
        });
    }

    Ok(TrustBundle { entries })
}
