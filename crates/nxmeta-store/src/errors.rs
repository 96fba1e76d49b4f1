//! Error handling for nxmeta-store
//!
//! Wraps nxmeta-core ExError with store-specific helpers

use nxmeta_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an error for a failed filesystem access.
///
/// A missing file maps to `NotFound`; anything else is `Io`.
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = match err.kind() {
        std::io::ErrorKind::NotFound => ExErrorKind::NotFound,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a batch manifest validation error
pub fn manifest_error(path: Option<&Path>, reason: &str) -> ExError {
    let err = ExError::new(ExErrorKind::InvalidManifest)
        .with_op("manifest_parse")
        .with_message(reason.to_string());
    match path {
        Some(path) => err.with_path(path.display().to_string()),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = io_error(
            "load",
            Path::new("missing.npdm"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.path(), Some("missing.npdm"));
    }

    #[test]
    fn test_other_failures_are_io() {
        let err = io_error(
            "load",
            Path::new("locked.npdm"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.code(), "ERR_IO");
    }

    #[test]
    fn test_manifest_error_carries_path() {
        let err = manifest_error(Some(Path::new("batch.yaml")), "bad yaml");
        assert_eq!(err.kind(), ExErrorKind::InvalidManifest);
        assert_eq!(err.op(), Some("manifest_parse"));
        assert_eq!(err.path(), Some("batch.yaml"));
        assert_eq!(manifest_error(None, "x").path(), None);
    }
}
