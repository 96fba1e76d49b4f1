//! Kernel capability block decoder
//!
//! A descriptor's type is the number of consecutive 1-bits starting at bit 0
//! (its "bitcount"). Decoding is a lookup in a static dispatch table keyed by
//! bitcount; unregistered bitcounts become `Unknown` descriptors.

use super::descriptor::*;
use crate::diagnostics::{Diagnostic, DiagnosticSink, PairFault};
use crate::errors::ParseError;
use byteorder::{ByteOrder, LittleEndian};

/// Empty descriptor slot; skipped without producing output
pub const PADDING: u32 = 0xFFFF_FFFF;

/// Bitcount of the MemoryMap descriptor, the only paired type
pub const MEMORY_MAP_BITCOUNT: u32 = 6;

/// Result of running one decoder on the word at the cursor
enum Decoded {
    /// Consumed one word
    Single(CapabilityDescriptor),
    /// Consumed the word and its successor
    Pair(CapabilityDescriptor),
    /// Pair could not be completed; skip one word
    Malformed(PairFault),
}

type DecodeFn = fn(u32, Option<u32>) -> Decoded;

const DISPATCH: &[(u32, DecodeFn)] = &[
    (3, thread_info),
    (4, system_call),
    (MEMORY_MAP_BITCOUNT, memory_map),
    (7, io_memory_map),
    (10, memory_region_map),
    (11, interrupt),
    (13, misc_params),
    (14, kernel_version),
    (15, handle_table_size),
    (16, misc_flags),
];

/// Number of consecutive set bits starting from bit 0
pub fn bitcount(word: u32) -> u32 {
    word.trailing_ones()
}

fn lookup(bitcount: u32) -> Option<DecodeFn> {
    DISPATCH
        .iter()
        .find(|(bc, _)| *bc == bitcount)
        .map(|(_, f)| *f)
}

/// Decode a sequence of descriptor words.
///
/// Never fails: malformed pairs and unknown bitcounts are reported to `sink`
/// and decoding continues with the next word.
pub fn decode(words: &[u32], sink: &mut dyn DiagnosticSink) -> KernelCapabilities {
    let mut caps = KernelCapabilities::default();
    let mut pos = 0;
    while pos < words.len() {
        let word = words[pos];
        if word == PADDING {
            pos += 1;
            continue;
        }

        let bc = bitcount(word);
        match lookup(bc) {
            Some(decoder) => match decoder(word, words.get(pos + 1).copied()) {
                Decoded::Single(descriptor) => {
                    caps.push(descriptor);
                    pos += 1;
                }
                Decoded::Pair(descriptor) => {
                    caps.push(descriptor);
                    pos += 2;
                }
                Decoded::Malformed(fault) => {
                    sink.report(Diagnostic::MalformedCapability {
                        index: pos,
                        value: word,
                        fault,
                    });
                    pos += 1;
                }
            },
            None => {
                sink.report(Diagnostic::UnknownDescriptor {
                    index: pos,
                    value: word,
                    bitcount: bc,
                });
                caps.push(CapabilityDescriptor::Unknown(UnknownDescriptor { value: word }));
                pos += 1;
            }
        }
    }
    caps
}

/// Decode a raw capability block (little-endian u32 words)
///
/// # Errors
///
/// Returns [`ParseError::MisalignedCapabilityBlock`] if the block length is not
/// a multiple of 4.
pub fn decode_bytes(
    bytes: &[u8],
    sink: &mut dyn DiagnosticSink,
) -> Result<KernelCapabilities, ParseError> {
    if bytes.len() % 4 != 0 {
        return Err(ParseError::MisalignedCapabilityBlock { size: bytes.len() });
    }
    let words: Vec<u32> = bytes.chunks_exact(4).map(LittleEndian::read_u32).collect();
    Ok(decode(&words, sink))
}

// ----- Decoders -----

fn thread_info(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::ThreadInfo(ThreadInfo {
        value: v,
        lowest_priority: ((v >> 4) & 0x3F) as u8,
        highest_priority: ((v >> 10) & 0x3F) as u8,
        min_core_number: ((v >> 16) & 0xFF) as u8,
        max_core_number: ((v >> 24) & 0xFF) as u8,
    }))
}

fn system_call(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::SystemCall(SystemCall {
        value: v,
        system_call_id: (v >> 5) & 0x00FF_FFFF,
        index: ((v >> 29) & 0x7) as u8,
    }))
}

fn memory_map(v: u32, next: Option<u32>) -> Decoded {
    let n = match next {
        None => return Decoded::Malformed(PairFault::MissingSuccessor),
        Some(n) if bitcount(n) != MEMORY_MAP_BITCOUNT => {
            return Decoded::Malformed(PairFault::SuccessorMismatch {
                next_bitcount: bitcount(n),
            })
        }
        Some(n) => n,
    };
    Decoded::Pair(CapabilityDescriptor::MemoryMap(MemoryMap {
        value0: v,
        value1: n,
        begin_address: u64::from((v & 0x7FFF_FFFF) >> 7) << 12,
        permission: if v >> 31 == 0 {
            PermissionType::ReadWrite
        } else {
            PermissionType::ReadOnly
        },
        size: u64::from((n >> 7) & 0x000F_FFFF) << 12,
        reserved: ((n >> 27) & 0xF) as u8,
        mapping: if n >> 31 == 0 {
            MappingType::Io
        } else {
            MappingType::Static
        },
    }))
}

fn io_memory_map(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::IoMemoryMap(IoMemoryMap {
        value: v,
        begin_address: u64::from(v >> 8) << 12,
    }))
}

fn memory_region_map(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::MemoryRegionMap(MemoryRegionMap {
        value: v,
        region_types: [
            ((v >> 11) & 0x3F) as u8,
            ((v >> 18) & 0x3F) as u8,
            ((v >> 25) & 0x3F) as u8,
        ],
        region_is_read_only: [(v >> 17) & 1 == 1, (v >> 24) & 1 == 1, (v >> 31) & 1 == 1],
    }))
}

fn interrupt(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::Interrupt(Interrupt {
        value: v,
        interrupt_number0: ((v >> 12) & 0x3FF) as u16,
        interrupt_number1: ((v >> 22) & 0x3FF) as u16,
    }))
}

fn misc_params(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::MiscParams(MiscParams {
        value: v,
        program_type: ((v >> 14) & 0x7) as u8,
        reserved: v >> 17,
    }))
}

fn kernel_version(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::KernelVersion(KernelVersion {
        value: v,
        major: ((v >> 19) & 0x1FFF) as u16,
        minor: ((v >> 15) & 0xF) as u8,
    }))
}

fn handle_table_size(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::HandleTableSize(HandleTableSize {
        value: v,
        size: ((v >> 16) & 0x3FF) as u16,
        reserved: (v >> 26) as u8,
    }))
}

fn misc_flags(v: u32, _next: Option<u32>) -> Decoded {
    Decoded::Single(CapabilityDescriptor::MiscFlags(MiscFlags {
        value: v,
        enable_debug: (v >> 17) & 1 == 1,
        force_debug: (v >> 18) & 1 == 1,
        reserved: (v >> 19) as u16,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitcount() {
        assert_eq!(bitcount(0x0), 0);
        assert_eq!(bitcount(0x7), 3);
        assert_eq!(bitcount(0x3F), 6);
        assert_eq!(bitcount(0x3F | 0x100), 6);
        assert_eq!(bitcount(PADDING), 32);
    }

    #[test]
    fn test_dispatch_table_has_unique_bitcounts() {
        for (i, (a, _)) in DISPATCH.iter().enumerate() {
            for (b, _) in &DISPATCH[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_misaligned_block_rejected() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        assert_eq!(
            decode_bytes(&[0xFF; 6], &mut sink),
            Err(ParseError::MisalignedCapabilityBlock { size: 6 })
        );
    }
}
