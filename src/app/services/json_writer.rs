//! JSON output writing with selectable framing
//!
//! Notices stream to stdout (or a file) either as NDJSON, one object per
//! line, or as a single JSON array matching the historical converter output.
//! The writer is the only component that touches the output stream, so
//! concurrent file parsing can never interleave frames.

use crate::config::{Config, OutputFormat};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::models::Notice;

/// Streaming JSON writer for notice records
pub struct JsonWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    records_written: usize,
}

impl<W: Write> JsonWriter<W> {
    /// Create a writer over any byte sink
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            records_written: 0,
        }
    }

    /// Serialize and frame one notice
    pub fn write_notice(&mut self, notice: &Notice) -> Result<()> {
        match self.format {
            OutputFormat::Ndjson => {
                serde_json::to_writer(&mut self.writer, notice)?;
                self.writer
                    .write_all(b"\n")
                    .map_err(|e| Error::io("Failed to write record terminator", e))?;
            }
            OutputFormat::JsonArray => {
                let prefix: &[u8] = if self.records_written == 0 { b"[" } else { b"," };
                self.writer
                    .write_all(prefix)
                    .map_err(|e| Error::io("Failed to write array framing", e))?;
                serde_json::to_writer(&mut self.writer, notice)?;
            }
        }
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Close the framing and flush.
    ///
    /// An empty array-framed run still emits `[]`.
    pub fn finish(mut self) -> Result<usize> {
        if self.format == OutputFormat::JsonArray {
            let closing: &[u8] = if self.records_written == 0 { b"[]" } else { b"]" };
            self.writer
                .write_all(closing)
                .map_err(|e| Error::io("Failed to close array framing", e))?;
        }
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush output", e))?;
        Ok(self.records_written)
    }
}

/// Open the configured output sink: a buffered file, or stdout
pub fn open_output(config: &Config) -> Result<JsonWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match &config.output_file {
        Some(path) => Box::new(BufWriter::new(create_output_file(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    Ok(JsonWriter::new(sink, config.output_format))
}

fn create_output_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| {
        Error::io(
            format!("Failed to create output file {}", path.display()),
            e,
        )
    })
}
