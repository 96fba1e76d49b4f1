//! File Access Control block

use crate::errors::ParseError;
use crate::reader::{align4, BlockReader};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOwnerInfo {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDataOwnerInfo {
    pub id: u64,
    pub access: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAccessControl {
    pub version: u8,
    pub padding: [u8; 3],
    pub fs_access_flags: u64,
    pub content_owners: Vec<ContentOwnerInfo>,
    pub save_data_owners: Vec<SaveDataOwnerInfo>,
}

/// Parse a FAC block.
///
/// # Errors
///
/// - `Truncated` if the fixed header or a table count runs past the block
/// - `OffsetOutOfRange` if an owner table lies outside the block
/// - `TableOverflow` if a table declares more records than its size holds
pub fn parse(fac: BlockReader<'_>) -> Result<FileAccessControl, ParseError> {
    let version = fac.u8(0x0)?;
    let padding = fac.array::<3>(0x1)?;
    let fs_access_flags = fac.u64(0x4)?;
    let content_offset = fac.u32(0xC)?;
    let content_size = fac.u32(0x10)?;
    let save_data_offset = fac.u32(0x14)?;
    let save_data_size = fac.u32(0x18)?;

    // Both ranges are validated before either table is read.
    let content_table = owner_table(&fac, "ContentOwnerInfo", content_offset, content_size)?;
    let save_data_table =
        owner_table(&fac, "SaveDataOwnerInfo", save_data_offset, save_data_size)?;

    let content_owners = match content_table {
        Some(table) => parse_content_owners(table)?,
        None => Vec::new(),
    };
    let save_data_owners = match save_data_table {
        Some(table) => parse_save_data_owners(table, save_data_offset as usize)?,
        None => Vec::new(),
    };

    Ok(FileAccessControl {
        version,
        padding,
        fs_access_flags,
        content_owners,
        save_data_owners,
    })
}

/// Validate an owner table's range; tables with a zero offset or size are absent
fn owner_table<'a>(
    fac: &BlockReader<'a>,
    block: &'static str,
    offset: u32,
    size: u32,
) -> Result<Option<BlockReader<'a>>, ParseError> {
    let len = fac.len() as u64;
    let start = u64::from(offset);
    let end = start + u64::from(size);
    if start > len || end > len {
        return Err(ParseError::OffsetOutOfRange {
            block,
            offset: start,
            size: u64::from(size),
            parent_size: len,
        });
    }
    if offset == 0 || size == 0 {
        return Ok(None);
    }
    let data = fac.bytes(start as usize, size as usize)?;
    Ok(Some(BlockReader::new(block, data)))
}

fn parse_content_owners(table: BlockReader<'_>) -> Result<Vec<ContentOwnerInfo>, ParseError> {
    let count = table.u32(0)?;
    let mut cursor = 4usize;
    let mut owners = Vec::new();
    for _ in 0..count {
        if cursor + 8 > table.len() {
            return Err(overflow(&table, count));
        }
        owners.push(ContentOwnerInfo {
            id: table.u64(cursor)?,
        });
        cursor += 8;
    }
    Ok(owners)
}

/// Access bytes come first; ids start at the next 4-byte boundary (FAC-relative)
fn parse_save_data_owners(
    table: BlockReader<'_>,
    table_offset: usize,
) -> Result<Vec<SaveDataOwnerInfo>, ParseError> {
    let count = table.u32(0)?;
    let mut access_pos = 4usize;
    let mut id_pos = align4(table_offset + access_pos + count as usize) - table_offset;
    let mut owners = Vec::new();
    for _ in 0..count {
        if access_pos + 1 > table.len() || id_pos + 8 > table.len() {
            return Err(overflow(&table, count));
        }
        owners.push(SaveDataOwnerInfo {
            id: table.u64(id_pos)?,
            access: table.u8(access_pos)?,
        });
        access_pos += 1;
        id_pos += 8;
    }
    Ok(owners)
}

fn overflow(table: &BlockReader<'_>, count: u32) -> ParseError {
    ParseError::TableOverflow {
        block: table.block(),
        count,
        table_size: table.len() as u32,
    }
}
