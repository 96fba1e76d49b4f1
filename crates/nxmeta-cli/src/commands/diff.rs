//! Diff command
//!
//! Usage: nxmeta diff <PREV> <CUR>

use clap::Args;
use nxmeta_core::batch::diff_pair;
use nxmeta_core::DiffPair;
use nxmeta_store::FsLoader;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous version of the file
    pub prev: PathBuf,

    /// Current version of the file
    pub cur: PathBuf,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pair = DiffPair {
        prev: args.prev,
        cur: args.cur,
    };
    let changes = diff_pair(&pair, &FsLoader::new())?;
    super::print_json(&changes)
}
