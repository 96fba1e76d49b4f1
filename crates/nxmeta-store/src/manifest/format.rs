//! Batch manifest schema
//!
//! ```yaml
//! pairs:
//!   main:
//!     prev: 15.0.0/main.npdm
//!     cur: 16.0.0/main.npdm
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level manifest structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchManifest {
    /// Entry id → the two inputs to compare
    pub pairs: BTreeMap<String, ManifestPair>,
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestPair {
    pub prev: PathBuf,
    pub cur: PathBuf,
}
