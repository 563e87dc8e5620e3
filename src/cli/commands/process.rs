//! Process command implementation for the TED notice converter
//!
//! Orchestrates the full conversion workflow: discovery, per-file decoding
//! and parsing on a bounded worker pool, and JSON output from the driver
//! task so frames never interleave.

use super::shared::{ProcessingStats, create_progress_bar, print_summary, setup_logging};
use crate::app::services::archive::{self, PayloadKind};
use crate::app::services::discovery::{FileDiscovery, SourceFile};
use crate::app::services::json_writer;
use crate::app::services::text_parser::{ParseStats, TextNoticeParser};
use crate::app::services::xml_parser::XmlNoticeParser;
use crate::app::models::Notice;
use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::{Error, Result};
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of parsing one source file on a worker
struct FileOutcome {
    source: SourceFile,
    result: Result<(Vec<Notice>, ParseStats)>,
}

/// Process command runner.
///
/// 1. Set up logging and configuration
/// 2. Discover source files and tag eras
/// 3. Parse files concurrently, write records sequentially
/// 4. Report summary statistics
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting TED conversion");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = Config::new(
        args.input_path.clone(),
        args.output_file.clone(),
        args.output_format.into(),
        args.filter_pairs(),
        args.workers,
        args.show_progress(),
    )?;

    let files = FileDiscovery::new(config.input_path.clone()).discover()?;
    info!("Discovered {} source file(s)", files.len());

    let mut stats = ProcessingStats {
        files_discovered: files.len(),
        ..Default::default()
    };

    let progress = if config.show_progress && !files.is_empty() {
        Some(create_progress_bar(
            files.len() as u64,
            "Converting packages...",
        ))
    } else {
        None
    };

    let mut writer = json_writer::open_output(&config)?;

    // Files are independent: parse on a bounded pool, write from here
    let filters = config.filters.clone();
    let mut outcomes = futures::stream::iter(files.into_iter().map(|source| {
        let filters = filters.clone();
        tokio::task::spawn_blocking(move || {
            let result = parse_source_file(&source, &filters);
            FileOutcome { source, result }
        })
    }))
    .buffer_unordered(config.workers);

    while let Some(joined) = outcomes.next().await {
        let outcome = joined
            .map_err(|e| Error::processing_interrupted(format!("Worker panicked: {}", e)))?;

        match outcome.result {
            Ok((notices, parse_stats)) => {
                stats.files_processed += 1;
                stats.segments_found += parse_stats.segments_found;
                stats.notices_filtered += parse_stats.notices_filtered;
                stats.errors_encountered += parse_stats.errors.len();
                for diagnostic in &parse_stats.errors {
                    debug!("{}", diagnostic);
                }

                for notice in &notices {
                    writer.write_notice(notice)?;
                }
                stats.notices_emitted += notices.len();
            }
            Err(error) => {
                // Per-file failure: diagnostic, keep going
                stats.files_skipped += 1;
                stats.errors_encountered += 1;
                warn!(
                    "Skipping {}: {}",
                    outcome.source.path.display(),
                    error
                );
            }
        }

        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let written = writer.finish()?;
    debug_assert_eq!(written, stats.notices_emitted);

    stats.processing_time = start_time.elapsed();
    info!(
        "Wrote {} record(s) from {} file(s) in {:?}",
        stats.notices_emitted, stats.files_processed, stats.processing_time
    );

    if config.show_progress {
        print_summary(&stats);
    }

    Ok(stats)
}

/// Decode and parse every payload of one source file.
///
/// Runs on a blocking worker; any error here skips the whole file.
fn parse_source_file(
    source: &SourceFile,
    filters: &[(String, String)],
) -> Result<(Vec<Notice>, ParseStats)> {
    let documents = archive::read_source(source)?;

    let text_parser = TextNoticeParser::new(filters.to_vec());
    let xml_parser = XmlNoticeParser::new(filters.to_vec());

    let mut notices = Vec::new();
    let mut stats = ParseStats::new();

    for document in documents {
        let result = match document.kind {
            PayloadKind::Text => text_parser.parse(&document.content, &document.name),
            PayloadKind::Xml => xml_parser.parse(&document.content, &document.name),
        };

        notices.extend(result.notices);
        stats.segments_found += result.stats.segments_found;
        stats.notices_parsed += result.stats.notices_parsed;
        stats.notices_filtered += result.stats.notices_filtered;
        stats.lines_skipped += result.stats.lines_skipped;
        stats.errors.extend(result.stats.errors);
    }

    debug!(
        "{} [{}]: {} notice(s) from {} segment(s)",
        source.path.display(),
        source.era,
        notices.len(),
        stats.segments_found
    );

    Ok((notices, stats))
}
