//! Non-fatal findings reported while decoding
//!
//! Parsing and decoding stay pure: instead of logging directly they report
//! to a [`DiagnosticSink`] supplied by the caller. `Vec<Diagnostic>` collects
//! findings for assertions, [`TracingSink`] forwards them as `tracing`
//! warnings.

use crate::schema::EVENT_DIAGNOSTIC;
use serde::{Deserialize, Serialize};

/// Why a paired descriptor could not be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairFault {
    /// The paired descriptor was the last word of the block
    MissingSuccessor,
    /// The following word carries a different bitcount
    SuccessorMismatch { next_bitcount: u32 },
}

/// A single non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// A MemoryMap descriptor without a valid second word; the word is skipped
    MalformedCapability {
        index: usize,
        value: u32,
        fault: PairFault,
    },
    /// A descriptor whose bitcount has no decoder; kept as `Unknown`
    UnknownDescriptor {
        index: usize,
        value: u32,
        bitcount: u32,
    },
}

impl Diagnostic {
    /// Stable code, shared with the error taxonomy where one exists
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::MalformedCapability { .. } => {
                crate::errors::ExErrorKind::MalformedCapability.code()
            }
            Diagnostic::UnknownDescriptor { .. } => "WARN_UNKNOWN_DESCRIPTOR",
        }
    }
}

/// Receiver for non-fatal findings
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreSink;

impl DiagnosticSink for IgnoreSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Sink that emits each finding as a `tracing` warning
#[derive(Debug, Default, Clone)]
pub struct TracingSink {
    /// Input the findings belong to, if known
    pub path: Option<String>,
}

impl TracingSink {
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let path = self.path.as_deref().unwrap_or("<memory>");
        let code = diagnostic.code();
        match diagnostic {
            Diagnostic::MalformedCapability {
                index,
                value,
                fault,
            } => {
                tracing::warn!(
                    component = module_path!(),
                    event = EVENT_DIAGNOSTIC,
                    code,
                    path,
                    descriptor_index = index,
                    descriptor_value = value,
                    fault = ?fault,
                    "MemoryMap descriptor is missing a matching descriptor, ignoring"
                );
            }
            Diagnostic::UnknownDescriptor {
                index,
                value,
                bitcount,
            } => {
                tracing::warn!(
                    component = module_path!(),
                    event = EVENT_DIAGNOSTIC,
                    code,
                    path,
                    descriptor_index = index,
                    descriptor_value = value,
                    bitcount,
                    "Unknown descriptor, keeping it in the output"
                );
            }
        }
    }
}
