//! TextTED Library
//!
//! A Rust library for converting TED (Tenders Electronic Daily) bulk notice
//! archives into JSON records.
//!
//! This library provides tools for:
//! - Discovering monthly package archives in a mirrored TED directory tree
//! - Decoding per-era file encodings (latin1 text, UTF-8 text, TED XML)
//! - Segmenting bulk text files into individual procurement notices
//! - Extracting coded and free-text notice fields by label matching
//! - Streaming extraction from meta-XML and full TED-XML packages
//! - Emitting one JSON object per notice as NDJSON or a single array

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod archive;
        pub mod discovery;
        pub mod json_writer;
        pub mod text_parser;
        pub mod xml_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Era, Notice};
pub use config::Config;

/// Result type alias for TED processing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for TED notice processing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Archive could not be opened or read
    #[error("Archive error in '{file}': {message}")]
    Archive {
        file: String,
        message: String,
        #[source]
        source: Option<zip::result::ZipError>,
    },

    /// File bytes did not decode with the encoding expected for its era
    #[error("Decode error in '{file}': {message}")]
    Decode { file: String, message: String },

    /// JSON serialization failed
    #[error("JSON serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an archive error with context
    pub fn archive(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<zip::result::ZipError>,
    ) -> Self {
        Self::Archive {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a decode error
    pub fn decode(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        Self::Archive {
            file: "unknown".to_string(),
            message: "Archive read failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

