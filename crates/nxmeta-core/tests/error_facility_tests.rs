use nxmeta_core::errors::{ExError, ExErrorKind, ParseError};

#[test]
fn test_unrecognized_format_verifiable_by_kind() {
    let err = ParseError::UnrecognizedFormat { magic: 0x1234_5678 };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnrecognizedFormat);
    assert_eq!(ex_err.code(), "ERR_UNRECOGNIZED_FORMAT");
    assert_eq!(ex_err.block(), None);
    assert!(ex_err.message().contains("0x12345678"));
}

#[test]
fn test_missing_magic_shares_unrecognized_kind() {
    let ex_err: ExError = ParseError::MissingMagic { len: 2 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnrecognizedFormat);
    assert!(ex_err.message().contains("2 bytes"));
}

#[test]
fn test_invalid_magic_structured_fields() {
    let err = ParseError::InvalidMagic {
        block: "ACID",
        expected: 0x4449_4341,
        found: 0,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidMagic);
    assert_eq!(ex_err.code(), "ERR_INVALID_MAGIC");
    assert_eq!(ex_err.block(), Some("ACID"));
    assert_eq!(ex_err.op(), Some("parse"));
}

#[test]
fn test_table_overflow_reports_as_out_of_range() {
    let err = ParseError::TableOverflow {
        block: "SaveDataOwnerInfo",
        count: 9,
        table_size: 0x10,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::OffsetOutOfRange);
    assert_eq!(ex_err.code(), "ERR_OFFSET_OUT_OF_RANGE");
    assert_eq!(ex_err.block(), Some("SaveDataOwnerInfo"));
}

#[test]
fn test_truncated_conversion() {
    let err = ParseError::Truncated {
        block: "KIP1",
        offset: 0x110,
        needed: 0x100,
        len: 0x180,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Truncated);
    assert_eq!(ex_err.code(), "ERR_TRUNCATED");
    assert!(ex_err.message().contains("KIP1"));
}

#[test]
fn test_misaligned_capability_block_has_no_block_context() {
    let ex_err: ExError = ParseError::MisalignedCapabilityBlock { size: 6 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MisalignedCapabilityBlock);
    assert_eq!(ex_err.block(), None);
}

#[test]
fn test_invalid_text_conversion() {
    let ex_err: ExError = ParseError::InvalidText { block: "SAC" }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidText);
    assert_eq!(ex_err.code(), "ERR_INVALID_TEXT");
    assert_eq!(ex_err.block(), Some("SAC"));
}

#[test]
fn test_ex_error_builder_pattern() {
    let source = ExError::new(ExErrorKind::Io).with_message("permission denied");
    let ex_err = ExError::new(ExErrorKind::NotFound)
        .with_op("load")
        .with_path("/fw/main.npdm")
        .with_block("META")
        .with_message("Input not found")
        .with_source(source);

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.op(), Some("load"));
    assert_eq!(ex_err.path(), Some("/fw/main.npdm"));
    assert_eq!(ex_err.block(), Some("META"));
    assert!(ex_err.message().contains("not found"));
    assert_eq!(
        ex_err.source_error().map(ExError::kind),
        Some(ExErrorKind::Io)
    );
}

#[test]
fn test_ex_error_display() {
    let ex_err = ExError::new(ExErrorKind::FormatMismatch)
        .with_op("diff")
        .with_path("cur/main.npdm")
        .with_message("previous input is META, current input is INI1");

    let display_str = format!("{}", ex_err);

    assert!(display_str.starts_with("[ERR_FORMAT_MISMATCH]"));
    assert!(display_str.contains("diff"));
    assert!(display_str.contains("cur/main.npdm"));
    assert!(display_str.contains("INI1"));
}

#[test]
fn test_all_error_kinds_have_unique_codes() {
    use std::collections::HashSet;

    let kinds = vec![
        ExErrorKind::NotFound,
        ExErrorKind::Io,
        ExErrorKind::InvalidManifest,
        ExErrorKind::UnrecognizedFormat,
        ExErrorKind::InvalidMagic,
        ExErrorKind::OffsetOutOfRange,
        ExErrorKind::MisalignedCapabilityBlock,
        ExErrorKind::Truncated,
        ExErrorKind::InvalidText,
        ExErrorKind::MalformedCapability,
        ExErrorKind::FormatMismatch,
        ExErrorKind::Serialization,
        ExErrorKind::Internal,
    ];

    let codes: HashSet<_> = kinds.iter().map(|k| k.code()).collect();

    assert_eq!(codes.len(), kinds.len());
    for code in codes {
        assert!(code.starts_with("ERR_"));
    }
}
