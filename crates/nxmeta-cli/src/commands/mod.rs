//! Subcommand implementations

pub mod batch;
pub mod diff;
pub mod show;

use serde::Serialize;

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
