//! Show command
//!
//! Usage: nxmeta show <PATH>

use clap::Args;
use nxmeta_core::load_document;
use nxmeta_store::FsLoader;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// META, INI1 or trust bundle file
    pub path: PathBuf,
}

/// Execute show command
pub fn execute(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(&FsLoader::new(), &args.path)?;
    super::print_json(&document)
}
