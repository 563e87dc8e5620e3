//! Inspect command implementation: era census of a mirror tree
//!
//! Discovers source files without parsing them, then reports how many fall
//! into each format era. Useful for previewing a mirror before conversion
//! and for spotting directories the era heuristics misclassify.

use super::shared::{ProcessingStats, setup_logging};
use crate::Result;
use crate::app::services::discovery::FileDiscovery;
use crate::cli::args::InspectArgs;
use colored::Colorize;
use std::time::Instant;
use tracing::info;

/// Inspect command runner
pub async fn run_inspect(args: InspectArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), false)?;
    args.validate()?;

    let files = FileDiscovery::new(args.input_path.clone()).discover()?;
    let census = FileDiscovery::census(&files);
    info!("Discovered {} source file(s)", files.len());

    println!();
    println!(
        "{} {}",
        "TED mirror census:".bold(),
        args.input_path.display()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if files.is_empty() {
        println!("{}", "No TED source files found".yellow());
    } else {
        for (era, count) in &census {
            println!("   {:<20} {:>6}", era.green(), count);
        }
        println!("   {:<20} {:>6}", "total".bold(), files.len());
    }
    println!();

    Ok(ProcessingStats {
        files_discovered: files.len(),
        processing_time: start_time.elapsed(),
        ..Default::default()
    })
}
