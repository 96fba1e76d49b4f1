//! Service Access Control block

use crate::errors::ParseError;
use crate::reader::BlockReader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Control-byte bit marking a server (hosted) service
pub const SERVER_FLAG: u8 = 0x80;

/// Service name → raw control byte, split by role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccessControl {
    pub server: BTreeMap<String, u8>,
    pub client: BTreeMap<String, u8>,
}

/// Parse a SAC block: a stream of `[control][name]` records.
///
/// Name length is `(control & 7) + 1`. A repeated name overwrites the earlier
/// entry for the same role.
///
/// # Errors
///
/// - `Truncated` if a name runs past the end of the block
/// - `InvalidText` if a name is not valid UTF-8
pub fn parse(sac: BlockReader<'_>) -> Result<ServiceAccessControl, ParseError> {
    let mut out = ServiceAccessControl::default();
    let mut pos = 0;
    while pos < sac.len() {
        let control = sac.u8(pos)?;
        let size = usize::from(control & 0x7) + 1;
        let raw = sac.bytes(pos + 1, size)?;
        let name = std::str::from_utf8(raw)
            .map_err(|_| ParseError::InvalidText { block: sac.block() })?
            .to_owned();
        if control & SERVER_FLAG != 0 {
            out.server.insert(name, control);
        } else {
            out.client.insert(name, control);
        }
        pos += size + 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(control: u8, name: &str) -> Vec<u8> {
        let mut buf = vec![control];
        buf.extend_from_slice(name.as_bytes());
        buf
    }

    #[test]
    fn test_splits_server_and_client() {
        let mut buf = record(0x06, "fsp-srv");
        buf.extend(record(0x85, "lm:svc"));
        let sac = parse(BlockReader::new("SAC", &buf)).unwrap();
        assert_eq!(sac.client.get("fsp-srv"), Some(&0x06));
        assert!(sac.client.get("fsp-sr").is_none());
        assert_eq!(sac.server.get("lm:svc"), Some(&0x85));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut buf = record(0x01, "sm");
        buf.extend(record(0x41, "sm"));
        let sac = parse(BlockReader::new("SAC", &buf)).unwrap();
        assert_eq!(sac.client.len(), 1);
        assert_eq!(sac.client["sm"], 0x41);
    }

    #[test]
    fn test_name_past_end_is_truncated() {
        let buf = record(0x07, "abc");
        assert!(matches!(
            parse(BlockReader::new("SAC", &buf)),
            Err(ParseError::Truncated { block: "SAC", .. })
        ));
    }
}
