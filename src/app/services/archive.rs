//! Package archive reading and per-era byte decoding
//!
//! Monthly TED packages are ZIP archives holding one or more payload files.
//! Text-era payloads are decoded with the encoding of their era; XML-era
//! payloads are always UTF-8. A payload that does not decode is an error for
//! its file only, never for the run.

use crate::app::models::Era;
use crate::app::services::discovery::SourceFile;
use crate::{Error, Result};
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::Read;
use tracing::debug;

/// Payload flavour of a decoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Bulk text to be segmented by the text notice parser
    Text,
    /// TED XML to be handled by the streaming XML parser
    Xml,
}

/// A decoded payload extracted from a source file
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Archive entry name, or the file name for standalone files
    pub name: String,
    /// Decoded payload content
    pub content: String,
    /// How the payload should be parsed
    pub kind: PayloadKind,
}

/// Read and decode every payload of a discovered source file.
///
/// Standalone XML files yield a single document; ZIP packages yield one
/// document per archive entry.
pub fn read_source(source: &SourceFile) -> Result<Vec<SourceDocument>> {
    let display = source.path.display().to_string();

    if source
        .path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
    {
        let bytes = std::fs::read(&source.path)
            .map_err(|e| Error::io(format!("Failed to read {}", display), e))?;
        let content = decode_xml(&bytes, &display)?;
        return Ok(vec![SourceDocument {
            name: display,
            content,
            kind: PayloadKind::Xml,
        }]);
    }

    read_archive(source, &display)
}

/// Extract and decode all entries of a ZIP package
fn read_archive(source: &SourceFile, display: &str) -> Result<Vec<SourceDocument>> {
    let file = File::open(&source.path)
        .map_err(|e| Error::io(format!("Failed to open {}", display), e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::archive(display, "Not a readable ZIP archive", Some(e)))?;

    let mut documents = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::archive(display, format!("Failed to read entry {}", index), Some(e)))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io(format!("Failed to extract {}:{}", display, name), e))?;

        let is_xml_entry = !source.era.is_text()
            || name.to_ascii_lowercase().ends_with(".xml");

        let document = if is_xml_entry {
            SourceDocument {
                content: decode_xml(&bytes, display)?,
                name,
                kind: PayloadKind::Xml,
            }
        } else {
            SourceDocument {
                content: decode_text(&bytes, source.era, display)?,
                name,
                kind: PayloadKind::Text,
            }
        };
        documents.push(document);
    }

    let source_name = display;
    debug!("Extracted {} payload(s) from {}", documents.len(), source_name);
    Ok(documents)
}

/// Decode bulk text bytes with the encoding of the file's era.
///
/// The legacy feed is ISO-8859-1; windows-1252 is its WHATWG superset and
/// decodes every byte sequence, so the latin1 path cannot fail. The UTF-8
/// path is strict: mojibake from a mis-tagged era must surface as a decode
/// error rather than silently corrupt field values.
pub fn decode_text(bytes: &[u8], era: Era, file: &str) -> Result<String> {
    match era {
        Era::LegacyLatin1Text => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            Ok(decoded.into_owned())
        }
        _ => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::decode(file, format!("Invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()))),
    }
}

/// Decode an XML payload (always UTF-8 in the bulk feed)
fn decode_xml(bytes: &[u8], file: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        Error::decode(
            file,
            format!(
                "XML payload is not valid UTF-8 (byte {})",
                e.utf8_error().valid_up_to()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_package(dir: &TempDir, name: &str, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (entry_name, bytes) in entries {
            writer
                .start_file(*entry_name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_latin1_accents_transcode() {
        let decoded = decode_text(b"March\xe9 de travaux \xe0 Li\xe8ge", Era::LegacyLatin1Text, "t").unwrap();
        assert_eq!(decoded, "Marché de travaux à Liège");
    }

    #[test]
    fn test_utf8_era_is_strict() {
        // Valid UTF-8 passes through
        let decoded = decode_text("Marché".as_bytes(), Era::Utf8Text, "t").unwrap();
        assert_eq!(decoded, "Marché");

        // Latin1 bytes in the UTF-8 era are a decode error, not replacement noise
        let result = decode_text(b"March\xe9", Era::Utf8Text, "t");
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_read_text_package() {
        let dir = TempDir::new().unwrap();
        let path = write_package(&dir, "EN2006-11.ZIP", &[("EN2006-11.txt", b"1.1/1234\nHD: Works\x20\x20")]);

        let source = SourceFile {
            path,
            era: Era::LegacyLatin1Text,
        };
        let documents = read_source(&source).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].kind, PayloadKind::Text);
        assert!(documents[0].content.starts_with("1.1/1234"));
    }

    #[test]
    fn test_read_xml_package_entries_are_xml() {
        let dir = TempDir::new().unwrap();
        let path = write_package(
            &dir,
            "EN2019-01.zip",
            &[
                ("112233_2019.xml", b"<TED_EXPORT></TED_EXPORT>".as_slice()),
                ("445566_2019.xml", b"<TED_EXPORT></TED_EXPORT>".as_slice()),
            ],
        );

        let source = SourceFile {
            path,
            era: Era::FullXml,
        };
        let documents = read_source(&source).unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().all(|d| d.kind == PayloadKind::Xml));
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("EN2006-11.ZIP");
        std::fs::write(&path, b"this is not a zip file").unwrap();

        let source = SourceFile {
            path,
            era: Era::LegacyLatin1Text,
        };
        assert!(matches!(
            read_source(&source),
            Err(Error::Archive { .. })
        ));
    }
}
