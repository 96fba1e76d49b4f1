//! Batch command
//!
//! Usage: nxmeta batch <MANIFEST>
//!
//! Entries that fail to load or parse are listed under `skipped` in the
//! report; they do not fail the command.

use clap::Args;
use nxmeta_core::run_batch;
use nxmeta_store::{parse_manifest_file, FsLoader};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// YAML manifest: `pairs: { <id>: { prev: <path>, cur: <path> } }`
    pub manifest: PathBuf,
}

/// Execute batch command
pub fn execute(args: BatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pairs = parse_manifest_file(&args.manifest)?;
    let report = run_batch(&pairs, &FsLoader::new());
    super::print_json(&report)
}
