//! Format detection across every supported input
//!
//! A [`Document`] is whatever a file turned out to be: a META or INI1
//! container, or a trust bundle. Detection is by the magic at offset 0.

use crate::container::{self, Container, InitialProcessContainer, MetaContainer};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::diff::model::ChangeSet;
use crate::diff::{diff_initial_process, diff_meta, diff_trust_bundle};
use crate::errors::{ExError, ParseError, Result};
use crate::loader::ByteLoader;
use crate::trust::{self, TrustBundle, X509Decoder, TRUST_BUNDLE_MAGIC};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Document {
    Meta(MetaContainer),
    InitialProcess(InitialProcessContainer),
    TrustBundle(TrustBundle),
}

impl Document {
    /// Short format name for messages and logs
    pub fn format(&self) -> &'static str {
        match self {
            Document::Meta(_) => "META",
            Document::InitialProcess(_) => "INI1",
            Document::TrustBundle(_) => "TrustBundle",
        }
    }
}

impl From<Container> for Document {
    fn from(container: Container) -> Self {
        match container {
            Container::Meta(m) => Document::Meta(m),
            Container::InitialProcess(i) => Document::InitialProcess(i),
        }
    }
}

/// Parse any supported input. Trust bundle payloads are summarized with
/// [`X509Decoder`].
///
/// # Errors
///
/// Any [`ParseError`] from the selected parser.
pub fn parse_document(
    bytes: &[u8],
    sink: &mut dyn DiagnosticSink,
) -> std::result::Result<Document, ParseError> {
    match container::read_magic(bytes)? {
        TRUST_BUNDLE_MAGIC => trust::parse(bytes, &X509Decoder).map(Document::TrustBundle),
        _ => container::parse(bytes, sink).map(Document::from),
    }
}

/// Diff two documents of the same format; `None` on a format mismatch
pub fn diff_documents(prev: &Document, cur: &Document) -> Option<ChangeSet> {
    match (prev, cur) {
        (Document::Meta(p), Document::Meta(c)) => Some(ChangeSet::Meta(diff_meta(p, c))),
        (Document::InitialProcess(p), Document::InitialProcess(c)) => {
            Some(ChangeSet::InitialProcess(diff_initial_process(p, c)))
        }
        (Document::TrustBundle(p), Document::TrustBundle(c)) => {
            Some(ChangeSet::TrustBundle(diff_trust_bundle(p, c)))
        }
        _ => None,
    }
}

/// Load and parse one input, logging the operation and its diagnostics.
///
/// # Errors
///
/// - `NotFound` / `Io` from the loader
/// - any structural parse error, with the input path attached
pub fn load_document(loader: &dyn ByteLoader, path: &Path) -> Result<Document> {
    let start = Instant::now();
    let shown = path.display().to_string();
    log_op_start!("load_document", path = %shown);

    let result = loader.load(path).and_then(|bytes| {
        let mut sink = TracingSink::for_path(shown.clone());
        parse_document(&bytes, &mut sink)
            .map_err(|e| ExError::from(e).with_path(shown.clone()))
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(document) => {
            log_op_end!(
                "load_document",
                duration_ms = duration_ms,
                path = %shown,
                format = document.format()
            );
        }
        Err(err) => {
            log_op_error!("load_document", err.clone(), duration_ms = duration_ms, path = %shown);
        }
    }
    result
}
