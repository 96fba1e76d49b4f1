//! Batch driver: diff a named set of (previous, current) file pairs.
//!
//! A failing pair is logged and listed under `skipped`; it never aborts the
//! rest of the batch.

use crate::diff::model::ChangeSet;
use crate::document::{diff_documents, load_document};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::loader::ByteLoader;
use crate::schema::EVENT_SKIPPED;
use crate::{log_op_end, log_op_start};
use nxmeta_core_types::RunId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

/// One entry of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPair {
    pub prev: PathBuf,
    pub cur: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub run_id: RunId,
    /// Change-set per entry id, including empty ones
    pub results: BTreeMap<String, ChangeSet>,
    /// Entry id → reason it was skipped
    pub skipped: BTreeMap<String, String>,
}

/// Run every pair, in id order.
pub fn run_batch(pairs: &BTreeMap<String, DiffPair>, loader: &dyn ByteLoader) -> BatchReport {
    let run_id = RunId::new();
    let start = Instant::now();
    log_op_start!("batch", run_id = %run_id, pairs = pairs.len());

    let mut results = BTreeMap::new();
    let mut skipped = BTreeMap::new();
    for (id, pair) in pairs {
        match diff_pair(pair, loader) {
            Ok(changes) => {
                results.insert(id.clone(), changes);
            }
            Err(err) => {
                tracing::warn!(
                    component = module_path!(),
                    op = "batch",
                    event = EVENT_SKIPPED,
                    run_id = %run_id,
                    entry_id = %id,
                    err.code = err.code(),
                    "Skipping entry: {}",
                    err
                );
                skipped.insert(id.clone(), err.to_string());
            }
        }
    }

    log_op_end!(
        "batch",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %run_id,
        diffed = results.len(),
        skipped = skipped.len()
    );

    BatchReport {
        run_id,
        results,
        skipped,
    }
}

/// Load, parse and diff one pair
///
/// # Errors
///
/// - any load or parse error for either side
/// - `FormatMismatch` when the two sides are different formats
pub fn diff_pair(pair: &DiffPair, loader: &dyn ByteLoader) -> Result<ChangeSet> {
    let prev = load_document(loader, &pair.prev)?;
    let cur = load_document(loader, &pair.cur)?;
    diff_documents(&prev, &cur).ok_or_else(|| {
        ExError::new(ExErrorKind::FormatMismatch)
            .with_op("diff")
            .with_path(pair.cur.display().to_string())
            .with_message(format!(
                "previous input is {}, current input is {}",
                prev.format(),
                cur.format()
            ))
    })
}
