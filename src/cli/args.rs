//! Command-line argument definitions for the TED notice converter
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::config::OutputFormat;
use crate::constants::{DEFAULT_PARALLEL_WORKERS, MAX_PARALLEL_WORKERS};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the TED notice converter
///
/// Converts mirrored TED (Tenders Electronic Daily) bulk notice archives
/// into JSON records, one object per procurement notice.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "textted",
    version,
    about = "Convert TED bulk procurement notice archives to JSON",
    long_about = "Reads a locally mirrored TED directory tree (as produced by mirroring \
                  ftp://ftp.ted.europa.eu/monthly-packages/), segments each bulk file into \
                  individual procurement notices, extracts recognised fields, and emits one \
                  JSON record per notice. Handles the feed's historical format eras: latin1 \
                  text, UTF-8 text, meta-XML and full TED-XML."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the converter
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert notices to JSON (main command)
    Process(ProcessArgs),
    /// Report discovered source files per format era, without parsing
    Inspect(InspectArgs),
}

/// Arguments for the process command (main conversion)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Root of the mirrored TED directory tree
    #[arg(value_name = "PATH", help = "Path to the mirrored TED directory tree")]
    pub input_path: PathBuf,

    /// Output file for JSON records
    ///
    /// If not specified, records are written to stdout. Diagnostics always
    /// go to stderr either way.
    #[arg(
        short = 'o',
        long = "output-file",
        value_name = "FILE",
        help = "Write JSON records to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// JSON output framing
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "ndjson",
        help = "Output framing: one object per line, or a single JSON array"
    )]
    pub output_format: CliOutputFormat,

    /// Field filters (repeatable)
    ///
    /// A notice is emitted only when every given FIELD=VALUE pair matches.
    /// Field names are the JSON output names, e.g.
    /// `--filter document_document_type_code=7` keeps contract award notices.
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "FIELD=VALUE",
        help = "Emit only notices whose FIELD equals VALUE (repeatable)"
    )]
    pub filters: Vec<FilterSpec>,

    /// Number of parallel file workers
    ///
    /// Files are independent, so packages can be parsed concurrently.
    /// 0 selects the number of logical CPUs.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = DEFAULT_PARALLEL_WORKERS,
        help = "Number of parallel file workers (0 = auto)"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress progress and summary output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the inspect command (era census)
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Root of the mirrored TED directory tree
    #[arg(value_name = "PATH", help = "Path to the mirrored TED directory tree")]
    pub input_path: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// JSON framing options exposed on the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliOutputFormat {
    /// One JSON object per line
    Ndjson,
    /// A single JSON array of notice objects
    JsonArray,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Ndjson => OutputFormat::Ndjson,
            CliOutputFormat::JsonArray => OutputFormat::JsonArray,
        }
    }
}

/// A parsed `FIELD=VALUE` filter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub field: String,
    pub value: String,
}

impl FromStr for FilterSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((field, value)) = s.split_once('=') else {
            return Err(Error::configuration(format!(
                "Filter must be FIELD=VALUE, got '{}'",
                s
            )));
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(Error::configuration(
                "Filter field name cannot be empty".to_string(),
            ));
        }

        Ok(FilterSpec {
            field: field.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                self.input_path.display()
            )));
        }

        if !self.input_path.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                self.input_path.display()
            )));
        }

        if self.workers > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_PARALLEL_WORKERS
            )));
        }

        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Filter pairs in the form the parsers consume
    pub fn filter_pairs(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|f| (f.field.clone(), f.value.clone()))
            .collect()
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl InspectArgs {
    /// Validate the inspect command arguments
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                self.input_path.display()
            )));
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filter_spec_parsing() {
        let filter = FilterSpec::from_str("document_document_type_code=7").unwrap();
        assert_eq!(filter.field, "document_document_type_code");
        assert_eq!(filter.value, "7");

        // Values may contain '='
        let filter = FilterSpec::from_str("note=a=b").unwrap();
        assert_eq!(filter.value, "a=b");

        // Whitespace is trimmed
        let filter = FilterSpec::from_str(" contract_authority_country = FR ").unwrap();
        assert_eq!(filter.field, "contract_authority_country");
        assert_eq!(filter.value, "FR");

        assert!(FilterSpec::from_str("no-equals-sign").is_err());
        assert!(FilterSpec::from_str("=value").is_err());
    }

    #[test]
    fn test_process_args_validation() {
        let temp_dir = TempDir::new().unwrap();

        let args = ProcessArgs {
            input_path: temp_dir.path().to_path_buf(),
            output_file: None,
            output_format: CliOutputFormat::Ndjson,
            filters: Vec::new(),
            workers: 4,
            verbose: 0,
            quiet: false,
        };
        assert!(args.validate().is_ok());

        let mut invalid = args.clone();
        invalid.input_path = PathBuf::from("/nonexistent/mirror");
        assert!(invalid.validate().is_err());

        let mut invalid = args.clone();
        invalid.workers = MAX_PARALLEL_WORKERS + 1;
        assert!(invalid.validate().is_err());

        let mut invalid = args.clone();
        invalid.output_file = Some(PathBuf::from("/nonexistent/dir/out.json"));
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = ProcessArgs {
            input_path: temp_dir.path().to_path_buf(),
            output_file: None,
            output_format: CliOutputFormat::Ndjson,
            filters: Vec::new(),
            workers: 0,
            verbose: 0,
            quiet: false,
        };

        assert_eq!(args.get_log_level(), "warn");
        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");
        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");
        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.quiet = true;
        args.verbose = 0;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_cli_parses_documented_invocation() {
        // `textted process <path>` is the documented invocation
        let args = Args::try_parse_from(["textted", "process", "/tmp"]).unwrap();
        match args.command {
            Some(Commands::Process(process)) => {
                assert_eq!(process.input_path, PathBuf::from("/tmp"));
                assert_eq!(process.output_format, CliOutputFormat::Ndjson);
            }
            _ => panic!("expected process command"),
        }
    }
}
