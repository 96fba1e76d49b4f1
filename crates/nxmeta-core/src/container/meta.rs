//! META container: header, ACID and ACI0 with its FAC/SAC/KC sub-blocks

use super::{fac, sac, ACI0_MAGIC, ACID_MAGIC};
use crate::caps::{decode_bytes, KernelCapabilities};
use crate::diagnostics::DiagnosticSink;
use crate::errors::ParseError;
use crate::reader::BlockReader;
use serde::{Deserialize, Serialize};

pub use fac::{ContentOwnerInfo, FileAccessControl, SaveDataOwnerInfo};
pub use sac::ServiceAccessControl;

/// Local offset of the ACID magic (after the signature and public key)
const ACID_HEADER_OFFSET: usize = 0x200;

/// Scalar fields of the outer META header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaHeader {
    pub signature_key_generation: u32,
    pub reserved_x8: u32,
    pub flags: u8,
    pub reserved_xd: u8,
    pub main_thread_priority: u8,
    pub main_thread_core_number: u8,
    pub reserved_x10: u32,
    pub system_resource_size: u32,
    pub version: u32,
    pub main_thread_stack_size: u32,
    pub name: String,
    pub product_code: [u8; 0x10],
    #[serde(with = "crate::serde_hex")]
    pub reserved_x40: Vec<u8>,
}

/// Authenticated descriptor header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acid {
    pub size: u32,
    pub version: u8,
    pub unk_x209: u8,
    pub reserved_x20a: u8,
    pub reserved_x20b: u8,
    pub flags: u32,
    pub program_id_min: u64,
    pub program_id_max: u64,
}

/// ACI0 header scalars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AciHeader {
    pub reserved_x4: u32,
    pub reserved_x8: u32,
    pub reserved_xc: u32,
    pub program_id: u64,
    pub reserved_x18: u32,
    pub reserved_x1c: u32,
    pub reserved_x38: u32,
    pub reserved_x3c: u32,
}

/// Runtime access control descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aci {
    pub header: AciHeader,
    pub fac: FileAccessControl,
    pub sac: ServiceAccessControl,
    pub kc: KernelCapabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaContainer {
    pub header: MetaHeader,
    pub acid: Acid,
    pub aci: Aci,
}

/// Parse a META file. The magic at offset 0 has already been checked.
///
/// # Errors
///
/// - `OffsetOutOfRange` if ACI/ACID or FAC/SAC/KC lie outside their parent
/// - `InvalidMagic` on a bad ACID or ACI0 magic
/// - `MisalignedCapabilityBlock` if the KC size is not a multiple of 4
/// - `Truncated` / `InvalidText` from fixed-layout reads
pub fn parse(bytes: &[u8], sink: &mut dyn DiagnosticSink) -> Result<MetaContainer, ParseError> {
    let file = BlockReader::new("META", bytes);

    let header = MetaHeader {
        signature_key_generation: file.u32(0x4)?,
        reserved_x8: file.u32(0x8)?,
        flags: file.u8(0xC)?,
        reserved_xd: file.u8(0xD)?,
        main_thread_priority: file.u8(0xE)?,
        main_thread_core_number: file.u8(0xF)?,
        reserved_x10: file.u32(0x10)?,
        system_resource_size: file.u32(0x14)?,
        version: file.u32(0x18)?,
        main_thread_stack_size: file.u32(0x1C)?,
        name: file.c_string(0x20, 0x10)?,
        product_code: file.array::<0x10>(0x30)?,
        reserved_x40: file.bytes(0x40, 0x30)?.to_vec(),
    };

    let aci_offset = file.u32(0x70)?;
    let aci_size = file.u32(0x74)?;
    let acid_offset = file.u32(0x78)?;
    let acid_size = file.u32(0x7C)?;

    let aci_block = file.sub_block("ACI0", aci_offset, aci_size)?;
    let acid_block = file.sub_block("ACID", acid_offset, acid_size)?;

    let acid = parse_acid(acid_block)?;
    let aci = parse_aci(aci_block, sink)?;

    Ok(MetaContainer { header, acid, aci })
}

fn parse_acid(acid: BlockReader<'_>) -> Result<Acid, ParseError> {
    let base = ACID_HEADER_OFFSET;
    let magic = acid.u32(base)?;
    if magic != ACID_MAGIC {
        return Err(ParseError::InvalidMagic {
            block: "ACID",
            expected: ACID_MAGIC,
            found: magic,
        });
    }
    Ok(Acid {
        size: acid.u32(base + 0x4)?,
        version: acid.u8(base + 0x8)?,
        unk_x209: acid.u8(base + 0x9)?,
        reserved_x20a: acid.u8(base + 0xA)?,
        reserved_x20b: acid.u8(base + 0xB)?,
        flags: acid.u32(base + 0xC)?,
        program_id_min: acid.u64(base + 0x10)?,
        program_id_max: acid.u64(base + 0x18)?,
    })
}

fn parse_aci(aci: BlockReader<'_>, sink: &mut dyn DiagnosticSink) -> Result<Aci, ParseError> {
    let magic = aci.u32(0x0)?;
    if magic != ACI0_MAGIC {
        return Err(ParseError::InvalidMagic {
            block: "ACI0",
            expected: ACI0_MAGIC,
            found: magic,
        });
    }

    let header = AciHeader {
        reserved_x4: aci.u32(0x4)?,
        reserved_x8: aci.u32(0x8)?,
        reserved_xc: aci.u32(0xC)?,
        program_id: aci.u64(0x10)?,
        reserved_x18: aci.u32(0x18)?,
        reserved_x1c: aci.u32(0x1C)?,
        reserved_x38: aci.u32(0x38)?,
        reserved_x3c: aci.u32(0x3C)?,
    };

    let fac_block = aci.sub_block("FAC", aci.u32(0x20)?, aci.u32(0x24)?)?;
    let sac_block = aci.sub_block("SAC", aci.u32(0x28)?, aci.u32(0x2C)?)?;
    let kc_block = aci.sub_block("KC", aci.u32(0x30)?, aci.u32(0x34)?)?;
    if kc_block.len() % 4 != 0 {
        return Err(ParseError::MisalignedCapabilityBlock {
            size: kc_block.len(),
        });
    }

    let fac = fac::parse(fac_block)?;
    let sac = sac::parse(sac_block)?;
    let kc = decode_bytes(kc_block.as_slice(), sink)?;

    Ok(Aci {
        header,
        fac,
        sac,
        kc,
    })
}
