//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the parser, the diff
//! engine, the batch driver and the CLI.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Input identifiers
pub const FIELD_PATH: &str = "path";
pub const FIELD_ENTRY_ID: &str = "entry_id";
pub const FIELD_FORMAT: &str = "format";

// Decoder diagnostics
pub const FIELD_DESCRIPTOR_INDEX: &str = "descriptor_index";
pub const FIELD_DESCRIPTOR_VALUE: &str = "descriptor_value";
pub const FIELD_BITCOUNT: &str = "bitcount";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SKIPPED: &str = "skipped";
pub const EVENT_DIAGNOSTIC: &str = "diagnostic";
