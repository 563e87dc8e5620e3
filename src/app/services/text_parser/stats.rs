//! Parsing statistics and result structures for bulk text processing
//!
//! This module provides types for tracking segmentation counts, filter hits,
//! and per-segment diagnostics for downstream reporting.

use crate::app::models::Notice;

/// Parsing result with notices and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Successfully parsed notices, filters already applied
    pub notices: Vec<Notice>,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Number of notice delimiter lines found
    pub segments_found: usize,

    /// Number of notices successfully parsed (before filtering)
    pub notices_parsed: usize,

    /// Number of parsed notices dropped by field filters
    pub notices_filtered: usize,

    /// Number of malformed lines skipped inside segments
    pub lines_skipped: usize,

    /// List of parsing diagnostics for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notices that survived filtering
    pub fn notices_emitted(&self) -> usize {
        self.notices_parsed - self.notices_filtered
    }

    /// Calculate segment success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.segments_found == 0 {
            0.0
        } else {
            (self.notices_parsed as f64 / self.segments_found as f64) * 100.0
        }
    }
}
