//! Manifest parser with validation
//!
//! Parses YAML, rejects empty entries and resolves relative paths against the
//! manifest's directory.

use crate::errors::{io_error, manifest_error, Result};
use crate::manifest::format::BatchManifest;
use nxmeta_core::DiffPair;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parse a manifest file; relative entry paths are resolved against its directory
pub fn parse_manifest_file(path: &Path) -> Result<BTreeMap<String, DiffPair>> {
    let content = fs::read_to_string(path).map_err(|e| io_error("manifest_read", path, e))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    parse_manifest_str(&content, base_dir).map_err(|e| e.with_path(path.display().to_string()))
}

/// Parse a manifest from a string, resolving relative paths against `base_dir`
pub fn parse_manifest_str(content: &str, base_dir: &Path) -> Result<BTreeMap<String, DiffPair>> {
    let manifest: BatchManifest = serde_yaml::from_str(content)
        .map_err(|e| manifest_error(None, &format!("YAML parse error: {}", e)))?;

    validate_manifest(&manifest)?;

    let pairs = manifest
        .pairs
        .into_iter()
        .map(|(id, pair)| {
            let resolved = DiffPair {
                prev: base_dir.join(pair.prev),
                cur: base_dir.join(pair.cur),
            };
            (id, resolved)
        })
        .collect();
    Ok(pairs)
}

/// Validate a parsed manifest
fn validate_manifest(manifest: &BatchManifest) -> Result<()> {
    for (id, pair) in &manifest.pairs {
        if id.trim().is_empty() {
            return Err(manifest_error(None, "Entry id cannot be empty"));
        }
        if pair.prev.as_os_str().is_empty() || pair.cur.as_os_str().is_empty() {
            return Err(manifest_error(
                None,
                &format!("Entry {} needs both a prev and a cur path", id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxmeta_core::ExErrorKind;
    use std::path::PathBuf;

    #[test]
    fn test_parse_resolves_relative_paths() {
        let yaml = r#"
pairs:
  main:
    prev: old/main.npdm
    cur: /abs/new/main.npdm
"#;
        let pairs = parse_manifest_str(yaml, Path::new("/work")).unwrap();

        assert_eq!(pairs["main"].prev, PathBuf::from("/work/old/main.npdm"));
        // joining an absolute path keeps it unchanged
        assert_eq!(pairs["main"].cur, PathBuf::from("/abs/new/main.npdm"));
    }

    #[test]
    fn test_invalid_yaml_is_invalid_manifest() {
        let err = parse_manifest_str("pairs: [", Path::new(".")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidManifest);
        assert!(err.message().contains("YAML parse error"));
    }

    #[test]
    fn test_missing_cur_is_rejected() {
        let yaml = "pairs:\n  main:\n    prev: a.npdm\n";
        let err = parse_manifest_str(yaml, Path::new(".")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidManifest);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let yaml = "pairs:\n  main:\n    prev: ''\n    cur: b.npdm\n";
        let err = parse_manifest_str(yaml, Path::new(".")).unwrap_err();
        assert!(err.message().contains("main"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = "pairs: {}\nschema: 1\n";
        let err = parse_manifest_str(yaml, Path::new(".")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidManifest);
    }
}
