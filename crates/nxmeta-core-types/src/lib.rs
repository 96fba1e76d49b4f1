//! Core types shared across nxmeta facilities
//!
//! - **Correlation types**: RunId for tagging the log events of one batch run
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
