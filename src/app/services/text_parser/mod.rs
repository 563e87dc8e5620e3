//! Bulk text parser for TED notice payloads
//!
//! The text eras of the TED feed (pre-2011) publish one bulk file per
//! package holding hundreds of notices. This module segments such a file
//! into notice blocks and extracts recognised fields by label matching.
//!
//! ## Architecture
//!
//! - [`parser`] - Segmentation and section state machine
//! - [`sections`] - Section body parsing (coded pairs, scalars, `TX` subsections)
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use textted::app::services::text_parser::TextNoticeParser;
//!
//! let parser = TextNoticeParser::new(Vec::new());
//! let result = parser.parse("1.6/123456\nCY: FR\n", "EN2006-11");
//! assert_eq!(result.notices.len(), 1);
//! ```

pub mod parser;
pub mod sections;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::TextNoticeParser;
pub use stats::{ParseResult, ParseStats};
