//! INI1 initial-process container and its KIP1 records

use super::KIP1_MAGIC;
use crate::caps::{decode_bytes, KernelCapabilities};
use crate::diagnostics::DiagnosticSink;
use crate::errors::ParseError;
use crate::reader::BlockReader;
use serde::{Deserialize, Serialize};

/// Offset of the first KIP1 record
const FIRST_RECORD_OFFSET: usize = 0x10;
/// Fixed KIP1 header size, including the embedded KC block
pub const KIP_HEADER_SIZE: usize = 0x100;
const KIP_KC_OFFSET: usize = 0x80;
const KIP_KC_SIZE: usize = 0x80;

/// Text/ro/data segment placement inside a KIP1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub offset: u32,
    pub size: u32,
    pub compressed_size: u32,
}

/// KIP1 header scalars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KipHeader {
    pub name: String,
    pub program_id: u64,
    pub version: u32,
    pub main_thread_priority: u8,
    pub main_thread_core_number: u8,
    pub reserved_x1e: u8,
    pub flags: u8,
    pub text: SegmentDescriptor,
    pub ro: SegmentDescriptor,
    pub data: SegmentDescriptor,
    pub main_thread_affinity_mask: u32,
    pub main_thread_stack_size: u32,
    pub reserved_x4c: u32,
    /// Words at +0x5C through +0x7C
    pub reserved_x5c: [u32; 9],
}

/// One KIP1 record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialProcess {
    pub header: KipHeader,
    pub kc: KernelCapabilities,
}

impl InitialProcess {
    /// Identity used to key updated records: `{program_id:016X}_{name}`
    pub fn key(&self) -> String {
        format!("{:016X}_{}", self.header.program_id, self.header.name)
    }

    /// Whether `other` is the same process: same program id OR same name
    pub fn matches(&self, other: &InitialProcess) -> bool {
        self.header.program_id == other.header.program_id || self.header.name == other.header.name
    }

    /// Bytes occupied by this record, header included
    fn record_len(&self) -> usize {
        KIP_HEADER_SIZE
            + self.header.text.compressed_size as usize
            + self.header.ro.compressed_size as usize
            + self.header.data.compressed_size as usize
    }
}

/// INI1 header scalars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ini1Header {
    pub size: u32,
    pub process_count: u32,
    pub reserved_xc: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialProcessContainer {
    pub header: Ini1Header,
    pub processes: Vec<InitialProcess>,
}

/// Parse an INI1 file. The magic at offset 0 has already been checked.
///
/// # Errors
///
/// - `Truncated` if fewer than 0x100 bytes remain for a declared record
/// - `InvalidMagic` on a record without the KIP1 magic
/// - `InvalidText` if a record name is not valid UTF-8
pub fn parse(
    bytes: &[u8],
    sink: &mut dyn DiagnosticSink,
) -> Result<InitialProcessContainer, ParseError> {
    let file = BlockReader::new("INI1", bytes);
    let header = Ini1Header {
        size: file.u32(0x4)?,
        process_count: file.u32(0x8)?,
        reserved_xc: file.u32(0xC)?,
    };

    let mut processes = Vec::new();
    let mut pos = FIRST_RECORD_OFFSET;
    for _ in 0..header.process_count {
        let record = match pos.checked_add(KIP_HEADER_SIZE) {
            Some(end) if end <= bytes.len() => BlockReader::new("KIP1", &bytes[pos..end]),
            _ => {
                return Err(ParseError::Truncated {
                    block: "KIP1",
                    offset: pos,
                    needed: KIP_HEADER_SIZE,
                    len: bytes.len(),
                })
            }
        };
        let process = parse_kip(record, sink)?;
        pos = pos.saturating_add(process.record_len());
        processes.push(process);
    }

    Ok(InitialProcessContainer { header, processes })
}

fn parse_kip(
    kip: BlockReader<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Result<InitialProcess, ParseError> {
    let magic = kip.u32(0x0)?;
    if magic != KIP1_MAGIC {
        return Err(ParseError::InvalidMagic {
            block: "KIP1",
            expected: KIP1_MAGIC,
            found: magic,
        });
    }

    let segment = |base: usize| -> Result<SegmentDescriptor, ParseError> {
        Ok(SegmentDescriptor {
            offset: kip.u32(base)?,
            size: kip.u32(base + 0x4)?,
            compressed_size: kip.u32(base + 0x8)?,
        })
    };

    let mut reserved_x5c = [0u32; 9];
    for (i, word) in reserved_x5c.iter_mut().enumerate() {
        *word = kip.u32(0x5C + i * 4)?;
    }

    let header = KipHeader {
        name: kip.c_string(0x4, 0xC)?,
        program_id: kip.u64(0x10)?,
        version: kip.u32(0x18)?,
        main_thread_priority: kip.u8(0x1C)?,
        main_thread_core_number: kip.u8(0x1D)?,
        reserved_x1e: kip.u8(0x1E)?,
        flags: kip.u8(0x1F)?,
        text: segment(0x20)?,
        ro: segment(0x30)?,
        data: segment(0x40)?,
        main_thread_affinity_mask: kip.u32(0x2C)?,
        main_thread_stack_size: kip.u32(0x3C)?,
        reserved_x4c: kip.u32(0x4C)?,
        reserved_x5c,
    };

    let kc = decode_bytes(kip.bytes(KIP_KC_OFFSET, KIP_KC_SIZE)?, sink)?;

    Ok(InitialProcess { header, kc })
}
