//! Command implementations for the TED notice converter CLI
//!
//! Each command lives in its own module; common statistics, logging and
//! progress helpers are in [`shared`].

pub mod inspect;
pub mod process;
pub mod shared;

// Re-export the main types for convenient access
pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner.
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `process`: conversion workflow with JSON output
/// - `inspect`: era census of a mirror tree
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.get_command() {
        Commands::Process(process_args) => process::run_process(process_args).await,
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args).await,
    }
}
