//! Run configuration for the TED notice converter.
//!
//! A [`Config`] is resolved once from CLI arguments before processing starts
//! and is shared read-only across file workers.

use crate::constants::{DEFAULT_PARALLEL_WORKERS, MAX_PARALLEL_WORKERS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON output framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One JSON object per line (default)
    Ndjson,
    /// A single JSON array of notice objects
    JsonArray,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Ndjson
    }
}

/// Resolved configuration for a conversion run
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the mirrored TED directory tree
    pub input_path: PathBuf,

    /// Output file; `None` writes to stdout
    pub output_file: Option<PathBuf>,

    /// JSON framing of the output stream
    pub output_format: OutputFormat,

    /// Field filters; a notice is emitted only when all pairs match
    pub filters: Vec<(String, String)>,

    /// Number of files parsed concurrently
    pub workers: usize,

    /// Whether to render a progress bar on stderr
    pub show_progress: bool,
}

impl Config {
    /// Build a validated configuration.
    ///
    /// `workers == 0` selects the number of logical CPUs.
    pub fn new(
        input_path: PathBuf,
        output_file: Option<PathBuf>,
        output_format: OutputFormat,
        filters: Vec<(String, String)>,
        workers: usize,
        show_progress: bool,
    ) -> Result<Self> {
        if !input_path.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                input_path.display()
            )));
        }
        if !input_path.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                input_path.display()
            )));
        }

        let workers = match workers {
            0 => num_cpus::get(),
            n if n > MAX_PARALLEL_WORKERS => {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_PARALLEL_WORKERS
                )));
            }
            n => n,
        };

        Ok(Self {
            input_path,
            output_file,
            output_format,
            filters,
            workers,
            show_progress,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("."),
            output_file: None,
            output_format: OutputFormat::default(),
            filters: Vec::new(),
            workers: if DEFAULT_PARALLEL_WORKERS == 0 {
                num_cpus::get()
            } else {
                DEFAULT_PARALLEL_WORKERS
            },
            show_progress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validates_input_path() {
        let result = Config::new(
            PathBuf::from("/nonexistent/ted/mirror"),
            None,
            OutputFormat::Ndjson,
            Vec::new(),
            1,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_zero_workers_resolves_to_cpu_count() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(
            temp_dir.path().to_path_buf(),
            None,
            OutputFormat::Ndjson,
            Vec::new(),
            0,
            false,
        )
        .unwrap();
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_config_rejects_excessive_workers() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::new(
            temp_dir.path().to_path_buf(),
            None,
            OutputFormat::Ndjson,
            Vec::new(),
            MAX_PARALLEL_WORKERS + 1,
            false,
        );
        assert!(result.is_err());
    }
}
