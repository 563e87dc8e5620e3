//! Application constants for the TED notice converter
//!
//! This module contains format-era boundaries, file name patterns,
//! and default values used throughout the converter.

// =============================================================================
// Format Eras and File Patterns
// =============================================================================

/// First publication year of the UTF-8 bulk text format.
///
/// Text packages from earlier years are encoded as latin1.
pub const UTF8_TEXT_FROM_YEAR: u16 = 2008;

/// First publication year of the meta-XML package format
pub const META_XML_FROM_YEAR: u16 = 2011;

/// First publication year of the full TED-XML schema
pub const FULL_XML_FROM_YEAR: u16 = 2014;

/// Prefix of English-language bulk package archives (e.g. `EN2006-11.ZIP`).
///
/// Matching is case-insensitive; the FTP mirror mixes upper- and lower-case
/// names across years.
pub const PACKAGE_ARCHIVE_PREFIX: &str = "EN";

/// Extensions recognised as package archives
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Extensions recognised as standalone notice files
pub const XML_EXTENSION: &str = "xml";

// =============================================================================
// Section Codes (bulk text format)
// =============================================================================

/// Two-letter section codes whose body is a `CODE - Label` pair
pub const CODED_SECTIONS: &[&str] = &["AA", "AC", "TY", "NC", "TD", "PR", "RP"];

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of parallel file workers (0 = number of logical CPUs)
pub const DEFAULT_PARALLEL_WORKERS: usize = 0;

/// Upper bound on `--workers` to keep file handles and memory sane
pub const MAX_PARALLEL_WORKERS: usize = 64;

/// Progress bar refresh template
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
