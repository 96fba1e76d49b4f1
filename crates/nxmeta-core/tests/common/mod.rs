//! Byte-level fixture builders shared by the integration tests.
//!
//! Each builder lays out a minimal but well-formed input so tests can
//! change one field and assert on exactly that change.

use byteorder::{LittleEndian, WriteBytesExt};
use nxmeta_core::container::{ACI0_MAGIC, ACID_MAGIC, INI1_MAGIC, KIP1_MAGIC, META_MAGIC};
use nxmeta_core::trust::TRUST_BUNDLE_MAGIC;

#[allow(dead_code)]
pub const ACI_OFFSET: usize = 0x80;
#[allow(dead_code)]
pub const ACI_HEADER_SIZE: usize = 0x40;
#[allow(dead_code)]
pub const ACID_SIZE: usize = 0x240;
#[allow(dead_code)]
pub const KIP_HEADER_SIZE: usize = 0x100;

// ---------------------------------------------------------------------------
// Capability words
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn thread_info(lowest: u32, highest: u32, min_core: u32, max_core: u32) -> u32 {
    0x7 | (lowest & 0x3F) << 4 | (highest & 0x3F) << 10 | (min_core & 0xFF) << 16 | max_core << 24
}

#[allow(dead_code)]
pub fn system_call(index: u32, group_mask: u32) -> u32 {
    0xF | (group_mask & 0x00FF_FFFF) << 5 | (index & 0x7) << 29
}

/// Both words of a MemoryMap pair
#[allow(dead_code)]
pub fn memory_map(begin: u64, size: u64, read_only: bool, is_static: bool) -> [u32; 2] {
    let w0 = 0x3F | ((begin >> 12) as u32 & 0x00FF_FFFF) << 7 | u32::from(read_only) << 31;
    let w1 = 0x3F | ((size >> 12) as u32 & 0x000F_FFFF) << 7 | u32::from(is_static) << 31;
    [w0, w1]
}

#[allow(dead_code)]
pub fn io_memory_map(begin: u64) -> u32 {
    0x7F | ((begin >> 12) as u32) << 8
}

#[allow(dead_code)]
pub fn interrupt(first: u32, second: u32) -> u32 {
    0x7FF | (first & 0x3FF) << 12 | (second & 0x3FF) << 22
}

#[allow(dead_code)]
pub fn kernel_version(major: u32, minor: u32) -> u32 {
    0x3FFF | (minor & 0xF) << 15 | (major & 0x1FFF) << 19
}

#[allow(dead_code)]
pub fn handle_table_size(size: u32) -> u32 {
    0x7FFF | (size & 0x3FF) << 16
}

#[allow(dead_code)]
pub fn misc_flags(enable_debug: bool, force_debug: bool) -> u32 {
    0xFFFF | u32::from(enable_debug) << 17 | u32::from(force_debug) << 18
}

#[allow(dead_code)]
pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(words.len() * 4);
    for word in words {
        buf.write_u32::<LittleEndian>(*word).unwrap();
    }
    buf
}

fn align(value: usize, to: usize) -> usize {
    (value + to - 1) & !(to - 1)
}

fn pad_to(buf: &mut Vec<u8>, len: usize) {
    if buf.len() < len {
        buf.resize(len, 0);
    }
}

fn write_name(buf: &mut Vec<u8>, name: &str, field_len: usize) {
    let mut field = vec![0u8; field_len];
    let raw = name.as_bytes();
    let n = raw.len().min(field_len);
    field[..n].copy_from_slice(&raw[..n]);
    buf.extend_from_slice(&field);
}

// ---------------------------------------------------------------------------
// META
// ---------------------------------------------------------------------------

/// Inputs for a META file with one ACI0 and one ACID
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MetaFixture {
    pub name: String,
    pub program_id: u64,
    pub main_thread_priority: u8,
    pub acid_flags: u32,
    pub fs_access_flags: u64,
    pub content_owners: Vec<u64>,
    pub save_data_owners: Vec<(u64, u8)>,
    /// (service name, is server)
    pub services: Vec<(String, bool)>,
    /// Replaces the SAC block built from `services`
    pub raw_sac: Option<Vec<u8>>,
    pub kc: Vec<u32>,
}

impl Default for MetaFixture {
    fn default() -> Self {
        Self {
            name: "Application".to_string(),
            program_id: 0x0100_0000_0000_1000,
            main_thread_priority: 44,
            acid_flags: 0x2,
            fs_access_flags: 0x8000_0000_0000_0000,
            content_owners: Vec::new(),
            save_data_owners: Vec::new(),
            services: vec![("fsp-srv".to_string(), false)],
            raw_sac: None,
            kc: vec![thread_info(24, 59, 0, 3), system_call(0, 0x00FF_FFFE)],
        }
    }
}

#[allow(dead_code)]
impl MetaFixture {
    /// FAC block: 0x1C header, then the content and save data owner tables
    pub fn fac_bytes(&self) -> Vec<u8> {
        let mut coi = Vec::new();
        if !self.content_owners.is_empty() {
            coi.write_u32::<LittleEndian>(self.content_owners.len() as u32)
                .unwrap();
            for id in &self.content_owners {
                coi.write_u64::<LittleEndian>(*id).unwrap();
            }
        }

        let coi_offset = if coi.is_empty() { 0 } else { 0x1C };
        let sdoi_start = 0x1C + coi.len();
        let mut sdoi = Vec::new();
        if !self.save_data_owners.is_empty() {
            sdoi.write_u32::<LittleEndian>(self.save_data_owners.len() as u32)
                .unwrap();
            for (_, access) in &self.save_data_owners {
                sdoi.push(*access);
            }
            let ids_at = align(sdoi_start + sdoi.len(), 4) - sdoi_start;
            pad_to(&mut sdoi, ids_at);
            for (id, _) in &self.save_data_owners {
                sdoi.write_u64::<LittleEndian>(*id).unwrap();
            }
        }
        let sdoi_offset = if sdoi.is_empty() { 0 } else { sdoi_start };

        let mut fac = Vec::new();
        fac.push(1);
        fac.extend_from_slice(&[0, 0, 0]);
        fac.write_u64::<LittleEndian>(self.fs_access_flags).unwrap();
        fac.write_u32::<LittleEndian>(coi_offset).unwrap();
        fac.write_u32::<LittleEndian>(coi.len() as u32).unwrap();
        fac.write_u32::<LittleEndian>(sdoi_offset as u32).unwrap();
        fac.write_u32::<LittleEndian>(sdoi.len() as u32).unwrap();
        fac.extend_from_slice(&coi);
        fac.extend_from_slice(&sdoi);
        fac
    }

    pub fn sac_bytes(&self) -> Vec<u8> {
        if let Some(raw) = &self.raw_sac {
            return raw.clone();
        }
        let mut sac = Vec::new();
        for (name, server) in &self.services {
            let len = name.len().clamp(1, 8);
            let mut control = (len - 1) as u8;
            if *server {
                control |= 0x80;
            }
            sac.push(control);
            sac.extend_from_slice(&name.as_bytes()[..len]);
        }
        sac
    }

    /// ACI0 block with FAC, SAC and KC laid out back to back.
    ///
    /// A few trailing bytes keep every sub-block offset strictly inside the
    /// ACI0, even when a sub-block is empty.
    pub fn aci_bytes(&self) -> Vec<u8> {
        let fac = self.fac_bytes();
        let sac = self.sac_bytes();
        let kc = words_to_bytes(&self.kc);

        let fac_offset = ACI_HEADER_SIZE;
        let sac_offset = fac_offset + fac.len();
        let kc_offset = align(sac_offset + sac.len(), 4);

        let mut aci = Vec::new();
        aci.write_u32::<LittleEndian>(ACI0_MAGIC).unwrap();
        pad_to(&mut aci, 0x10);
        aci.write_u64::<LittleEndian>(self.program_id).unwrap();
        pad_to(&mut aci, 0x20);
        for (offset, size) in [
            (fac_offset, fac.len()),
            (sac_offset, sac.len()),
            (kc_offset, kc.len()),
        ] {
            aci.write_u32::<LittleEndian>(offset as u32).unwrap();
            aci.write_u32::<LittleEndian>(size as u32).unwrap();
        }
        pad_to(&mut aci, ACI_HEADER_SIZE);
        aci.extend_from_slice(&fac);
        aci.extend_from_slice(&sac);
        pad_to(&mut aci, kc_offset);
        aci.extend_from_slice(&kc);
        let end = align(aci.len() + 4, 0x10);
        pad_to(&mut aci, end);
        aci
    }

    pub fn acid_bytes(&self) -> Vec<u8> {
        let mut acid = vec![0u8; 0x200];
        acid.write_u32::<LittleEndian>(ACID_MAGIC).unwrap();
        acid.write_u32::<LittleEndian>(ACID_SIZE as u32 - 0x100)
            .unwrap();
        acid.push(1);
        acid.extend_from_slice(&[0, 0, 0]);
        acid.write_u32::<LittleEndian>(self.acid_flags).unwrap();
        acid.write_u64::<LittleEndian>(self.program_id).unwrap();
        acid.write_u64::<LittleEndian>(self.program_id | 0xFFF)
            .unwrap();
        pad_to(&mut acid, ACID_SIZE);
        acid
    }

    pub fn build(&self) -> Vec<u8> {
        let aci = self.aci_bytes();
        let acid = self.acid_bytes();
        let acid_offset = align(ACI_OFFSET + aci.len(), 0x10);
        self.build_with_layout(&aci, &acid, (ACI_OFFSET, aci.len()), (acid_offset, acid.len()))
    }

    /// Write the header with explicit ACI0/ACID placement; blocks are
    /// written at their declared offsets when those fit.
    pub fn build_with_layout(
        &self,
        aci: &[u8],
        acid: &[u8],
        aci_range: (usize, usize),
        acid_range: (usize, usize),
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(META_MAGIC).unwrap();
        pad_to(&mut buf, 0xE);
        buf.push(self.main_thread_priority);
        buf.push(3);
        pad_to(&mut buf, 0x18);
        buf.write_u32::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(0x0010_0000).unwrap();
        write_name(&mut buf, &self.name, 0x10);
        pad_to(&mut buf, 0x70);
        for (offset, size) in [aci_range, acid_range] {
            buf.write_u32::<LittleEndian>(offset as u32).unwrap();
            buf.write_u32::<LittleEndian>(size as u32).unwrap();
        }

        place(&mut buf, aci_range.0, aci);
        place(&mut buf, acid_range.0, acid);
        buf
    }
}

fn place(buf: &mut Vec<u8>, offset: usize, block: &[u8]) {
    pad_to(buf, offset + block.len());
    buf[offset..offset + block.len()].copy_from_slice(block);
}

// ---------------------------------------------------------------------------
// INI1 / KIP1
// ---------------------------------------------------------------------------

/// Inputs for one KIP1 record
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct KipFixture {
    pub name: String,
    pub program_id: u64,
    pub version: u32,
    pub main_thread_priority: u8,
    /// Compressed sizes of text, ro and data
    pub compressed_sizes: [u32; 3],
    pub kc: Vec<u32>,
}

#[allow(dead_code)]
impl KipFixture {
    pub fn new(name: &str, program_id: u64) -> Self {
        Self {
            name: name.to_string(),
            program_id,
            version: 1,
            main_thread_priority: 49,
            compressed_sizes: [0x10, 0x8, 0x4],
            kc: vec![thread_info(24, 59, 3, 3)],
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut kip = Vec::new();
        kip.write_u32::<LittleEndian>(KIP1_MAGIC).unwrap();
        write_name(&mut kip, &self.name, 0xC);
        kip.write_u64::<LittleEndian>(self.program_id).unwrap();
        kip.write_u32::<LittleEndian>(self.version).unwrap();
        kip.push(self.main_thread_priority);
        kip.push(3);
        kip.push(0);
        kip.push(0x3F);

        let mut segment_offset = 0u32;
        // text @0x20, affinity @0x2C, ro @0x30, stack @0x3C, data @0x40
        for (i, compressed) in self.compressed_sizes.iter().enumerate() {
            kip.write_u32::<LittleEndian>(segment_offset).unwrap();
            kip.write_u32::<LittleEndian>(compressed * 2).unwrap();
            kip.write_u32::<LittleEndian>(*compressed).unwrap();
            segment_offset += compressed * 2;
            match i {
                0 => kip.write_u32::<LittleEndian>(0x8).unwrap(),
                1 => kip.write_u32::<LittleEndian>(0x4000).unwrap(),
                _ => kip.write_u32::<LittleEndian>(0).unwrap(),
            }
        }
        pad_to(&mut kip, 0x80);

        let mut kc = self.kc.clone();
        kc.resize(0x20, 0xFFFF_FFFF);
        kip.extend_from_slice(&words_to_bytes(&kc));

        let payload: u32 = self.compressed_sizes.iter().sum();
        kip.extend(std::iter::repeat(0xAA).take(payload as usize));
        kip
    }
}

/// INI1 file holding `kips` in order
#[allow(dead_code)]
pub fn ini1_bytes(kips: &[KipFixture]) -> Vec<u8> {
    let records: Vec<u8> = kips.iter().flat_map(KipFixture::bytes).collect();
    let mut buf = Vec::new();
    buf.write_u32::<LittleEndian>(INI1_MAGIC).unwrap();
    buf.write_u32::<LittleEndian>((0x10 + records.len()) as u32)
        .unwrap();
    buf.write_u32::<LittleEndian>(kips.len() as u32).unwrap();
    buf.write_u32::<LittleEndian>(0).unwrap();
    buf.extend_from_slice(&records);
    buf
}

// ---------------------------------------------------------------------------
// Trust bundle
// ---------------------------------------------------------------------------

/// Trust bundle with `(id, status, payload)` entries; payloads follow the
/// entry table in order
#[allow(dead_code)]
pub fn trust_bundle_bytes(entries: &[(u32, u32, &[u8])]) -> Vec<u8> {
    let table_len = entries.len() * 0x10;
    let mut buf = Vec::new();
    buf.write_u32::<LittleEndian>(TRUST_BUNDLE_MAGIC).unwrap();
    buf.write_u32::<LittleEndian>(entries.len() as u32).unwrap();

    let mut data_offset = table_len;
    for (id, status, data) in entries {
        buf.write_u32::<LittleEndian>(*id).unwrap();
        buf.write_u32::<LittleEndian>(*status).unwrap();
        buf.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        buf.write_u32::<LittleEndian>(data_offset as u32).unwrap();
        data_offset += data.len();
    }
    for (_, _, data) in entries {
        buf.extend_from_slice(data);
    }
    buf
}
