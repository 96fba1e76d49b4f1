//! Bounds-checked little-endian field reads
//!
//! Every read names the block it belongs to so a short buffer surfaces as a
//! `Truncated` error pointing at the right structure.

use crate::errors::ParseError;
use byteorder::{ByteOrder, LittleEndian};

/// Read-only view over one block of a container
#[derive(Debug, Clone, Copy)]
pub struct BlockReader<'a> {
    block: &'static str,
    data: &'a [u8],
}

impl<'a> BlockReader<'a> {
    pub fn new(block: &'static str, data: &'a [u8]) -> Self {
        Self { block, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn block(&self) -> &'static str {
        self.block
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], ParseError> {
        let end = offset.checked_add(len).filter(|end| *end <= self.data.len());
        match end {
            Some(end) => Ok(&self.data[offset..end]),
            None => Err(ParseError::Truncated {
                block: self.block,
                offset,
                needed: len,
                len: self.data.len(),
            }),
        }
    }

    pub fn u8(&self, offset: usize) -> Result<u8, ParseError> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn u32(&self, offset: usize) -> Result<u32, ParseError> {
        Ok(LittleEndian::read_u32(self.bytes(offset, 4)?))
    }

    pub fn u64(&self, offset: usize) -> Result<u64, ParseError> {
        Ok(LittleEndian::read_u64(self.bytes(offset, 8)?))
    }

    /// Fixed-size byte array (names, product codes)
    pub fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], ParseError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    /// NUL-terminated UTF-8 text stored in a fixed-size field
    pub fn c_string(&self, offset: usize, field_len: usize) -> Result<String, ParseError> {
        let raw = self.bytes(offset, field_len)?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        std::str::from_utf8(&raw[..end])
            .map(str::to_owned)
            .map_err(|_| ParseError::InvalidText { block: self.block })
    }

    /// Slice a nested block after validating its offset/size against this one.
    ///
    /// The offset must lie strictly inside the parent and the end must not
    /// pass the parent's end.
    pub fn sub_block(
        &self,
        block: &'static str,
        offset: u32,
        size: u32,
    ) -> Result<BlockReader<'a>, ParseError> {
        let parent_size = self.data.len() as u64;
        let start = u64::from(offset);
        let end = start + u64::from(size);
        if start >= parent_size || end > parent_size {
            return Err(ParseError::OffsetOutOfRange {
                block,
                offset: start,
                size: u64::from(size),
                parent_size,
            });
        }
        Ok(BlockReader::new(
            block,
            &self.data[start as usize..end as usize],
        ))
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }
}

/// Round `value` up to the next multiple of 4
pub fn align4(value: usize) -> usize {
    (value + 3) & !3
}
