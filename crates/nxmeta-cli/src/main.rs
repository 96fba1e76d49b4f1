//! nxmeta CLI
//!
//! Command-line interface for inspecting and diffing program metadata

use clap::{Parser, Subcommand};
use nxmeta_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "nxmeta")]
#[command(about = "nxmeta - Parse and diff META, INI1 and trust bundle files", long_about = None)]
struct Cli {
    /// Emit JSON structured logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse one file and print its tree
    Show(commands::show::ShowArgs),
    /// Diff two files of the same format
    Diff(commands::diff::DiffArgs),
    /// Diff every pair listed in a YAML manifest
    Batch(commands::batch::BatchArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Show(args) => commands::show::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Batch(args) => commands::batch::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
