//! Core bulk text parser implementation
//!
//! This module segments a decoded bulk text payload into per-notice blocks
//! and drives section extraction over each block.

use regex::Regex;
use tracing::{debug, warn};

use super::sections::{apply_section, extract_value};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::Notice;

/// Bulk text parser for TED notice payloads.
///
/// One payload holds many notices. A notice block starts at a delimiter line
/// `<version>/<id>` (e.g. `1.6/123456`); within a block, sections start at
/// `XX: ` label lines with body text indented to column four.
#[derive(Debug)]
pub struct TextNoticeParser {
    doc_delimiter: Regex,
    section_start: Regex,
    filters: Vec<(String, String)>,
}

impl TextNoticeParser {
    /// Create a new parser with optional field filters.
    ///
    /// Filtered-out notices are parsed fully but counted instead of returned.
    pub fn new(filters: Vec<(String, String)>) -> Self {
        Self {
            doc_delimiter: Regex::new(r"^(\d+\.\d+)/(\d+)").expect("delimiter regex is valid"),
            section_start: Regex::new(r"^([A-Z]{2}): ").expect("section regex is valid"),
            filters,
        }
    }

    /// Parse a decoded payload and return notices with statistics.
    ///
    /// Malformed content degrades per line or per segment; this function
    /// itself never fails.
    pub fn parse(&self, text: &str, payload_name: &str) -> ParseResult {
        let mut stats = ParseStats::new();
        let mut notices = Vec::new();

        let mut current: Option<Segment> = None;
        for line in text.lines() {
            if let Some(captures) = self.doc_delimiter.captures(line) {
                if let Some(segment) = current.take() {
                    self.finish_segment(segment, &mut notices, &mut stats);
                }
                stats.segments_found += 1;
                current = Some(Segment::new(
                    captures[1].to_string(),
                    captures[2].to_string(),
                ));
                continue;
            }

            let Some(segment) = current.as_mut() else {
                // Preamble before the first delimiter (package banners etc.)
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            segment.raw.push_str(line);
            segment.raw.push('\n');

            if let Some(captures) = self.section_start.captures(line) {
                segment.close_section();
                segment.section = Some(captures[1].to_string());
                segment.section_data.push(line[4..].trim().to_string());
            } else if segment.section.is_some() {
                if let Some(body) = line.strip_prefix("    ") {
                    segment.section_data.push(body.trim().to_string());
                } else if let Some(last) = segment.section_data.last_mut() {
                    // Hard-wrapped continuation of the previous body line
                    last.push_str(line.trim());
                }
            } else {
                // Body text before any section header: skip, keep going
                stats.lines_skipped += 1;
                stats.errors.push(format!(
                    "{}: line outside any section in notice {}",
                    payload_name, segment.notice.doc_id
                ));
            }
        }

        if let Some(segment) = current.take() {
            self.finish_segment(segment, &mut notices, &mut stats);
        }

        if stats.lines_skipped > 0 {
            warn!(
                "{}: skipped {} malformed line(s)",
                payload_name, stats.lines_skipped
            );
        }
        debug!(
            "{}: {} segment(s), {} notice(s) after filters",
            payload_name,
            stats.segments_found,
            stats.notices_emitted()
        );

        ParseResult { notices, stats }
    }

    /// Close the trailing section, run best-effort extraction, apply filters
    fn finish_segment(
        &self,
        mut segment: Segment,
        notices: &mut Vec<Notice>,
        stats: &mut ParseStats,
    ) {
        segment.close_section();
        let mut notice = segment.notice;

        if let Some((amount, currency)) = extract_value(&segment.raw) {
            notice.value = Some(amount);
            notice.currency = Some(currency);
        }

        stats.notices_parsed += 1;
        if notice.matches_filters(&self.filters) {
            notices.push(notice);
        } else {
            stats.notices_filtered += 1;
        }
    }
}

/// One notice block under construction
struct Segment {
    notice: Notice,
    section: Option<String>,
    section_data: Vec<String>,
    /// Raw block text, kept for best-effort value scraping
    raw: String,
}

impl Segment {
    fn new(doc_version: String, doc_id: String) -> Self {
        Self {
            notice: Notice {
                doc_version,
                doc_id,
                ..Default::default()
            },
            section: None,
            section_data: Vec::new(),
            raw: String::new(),
        }
    }

    fn close_section(&mut self) {
        if let Some(code) = self.section.take() {
            let data = std::mem::take(&mut self.section_data);
            apply_section(&mut self.notice, &code, data);
        }
    }
}
