//! Shared components for CLI commands
//!
//! Common statistics, logging setup and progress reporting used by the
//! process and inspect commands.

use crate::Result;
use crate::constants::PROGRESS_TEMPLATE;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use tracing::debug;

/// Processing statistics for reporting across commands
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of source files discovered
    pub files_discovered: usize,
    /// Number of files fully processed
    pub files_processed: usize,
    /// Number of files skipped after a decode/parse failure
    pub files_skipped: usize,
    /// Number of notice segments found across all files
    pub segments_found: usize,
    /// Number of notices dropped by field filters
    pub notices_filtered: usize,
    /// Number of JSON records written
    pub notices_emitted: usize,
    /// Number of errors encountered (per-file and per-segment)
    pub errors_encountered: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

/// Set up structured logging to stderr.
///
/// stdout is reserved for JSON records, so every diagnostic goes to stderr.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("textted={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Create a styled progress bar for multi-file runs
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .expect("progress template is valid")
            .progress_chars("##-"),
    );
    bar.set_message(message.to_string());
    bar
}

/// Print the end-of-run summary to stderr
pub fn print_summary(stats: &ProcessingStats) {
    eprintln!();
    eprintln!("TED conversion complete");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("   • Files discovered: {}", stats.files_discovered);
    eprintln!("   • Files processed:  {}", stats.files_processed);
    if stats.files_skipped > 0 {
        eprintln!("   • Files skipped:    {}", stats.files_skipped);
    }
    eprintln!("   • Notices found:    {}", stats.segments_found);
    if stats.notices_filtered > 0 {
        eprintln!("   • Notices filtered: {}", stats.notices_filtered);
    }
    eprintln!("   • Records written:  {}", stats.notices_emitted);
    eprintln!(
        "   • Processing time:  {}",
        HumanDuration(stats.processing_time)
    );
    if stats.errors_encountered > 0 {
        eprintln!("   ⚠ Errors encountered: {}", stats.errors_encountered);
    }
    eprintln!();
}
