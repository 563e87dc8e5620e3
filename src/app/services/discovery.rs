//! Source file discovery for mirrored TED directory trees
//!
//! Walks an input root of arbitrary depth, recognises bulk package archives
//! and standalone notice XML files, and tags each with its format era.

use crate::app::models::Era;
use crate::constants::PACKAGE_ARCHIVE_PREFIX;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A discovered source file, tagged with its expected format era
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub era: Era,
}

/// File discovery component for TED mirror trees
#[derive(Debug)]
pub struct FileDiscovery {
    root: PathBuf,
}

impl FileDiscovery {
    /// Create a new discovery instance rooted at a mirror directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Discover all recognised source files under the root.
    ///
    /// TED mirrors follow this structure:
    /// ```text
    /// mirror/
    ///   2006-11/
    ///     EN2006-11.ZIP
    ///   2012-07/
    ///     EN2012-07.ZIP
    ///   2019-01/
    ///     EN2019-01.zip
    /// ```
    ///
    /// Unreadable directory entries are logged and skipped; the walk
    /// continues. Results are sorted by path so runs are deterministic.
    pub fn discover(&self) -> Result<Vec<SourceFile>> {
        if !self.root.exists() {
            return Err(Error::configuration(format!(
                "Mirror root does not exist: {}",
                self.root.display()
            )));
        }

        debug!("Searching for TED source files in: {}", self.root.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            if let Some(era) = Self::recognise(&path) {
                files.push(SourceFile { path, era });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Found {} source files", files.len());

        Ok(files)
    }

    /// Census of discovered files, grouped by era label
    pub fn census(files: &[SourceFile]) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for file in files {
            *counts.entry(file.era.label()).or_insert(0) += 1;
        }
        counts
    }

    /// Recognise a single path as a TED source file.
    ///
    /// ZIP archives must carry the English-package prefix (`EN*`, any case);
    /// the mirror also contains per-language packages we do not parse.
    /// Standalone XML files are accepted regardless of name.
    fn recognise(path: &Path) -> Option<Era> {
        let era = Era::classify(path)?;

        if era.is_text() || path.extension().is_some_and(|e| e.eq_ignore_ascii_case("zip")) {
            let stem = path.file_stem()?.to_str()?;
            if !stem
                .to_ascii_uppercase()
                .starts_with(PACKAGE_ARCHIVE_PREFIX)
            {
                return None;
            }
        }

        Some(era)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_discover_tags_eras_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("2006-11/EN2006-11.ZIP"));
        touch(&root.join("2009-03/EN2009-03.zip"));
        touch(&root.join("2012-07/EN2012-07.ZIP"));
        touch(&root.join("2019-01/EN2019-01.zip"));

        let files = FileDiscovery::new(root.to_path_buf()).discover().unwrap();
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].era, Era::LegacyLatin1Text);
        assert_eq!(files[1].era, Era::Utf8Text);
        assert_eq!(files[2].era, Era::MetaXml);
        assert_eq!(files[3].era, Era::FullXml);

        // Sorted by path
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_discover_skips_other_languages_and_noise() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("2006-11/EN2006-11.ZIP"));
        touch(&root.join("2006-11/DE2006-11.ZIP"));
        touch(&root.join("2006-11/FR2006-11.ZIP"));
        touch(&root.join("2006-11/README.txt"));
        touch(&root.join("2006-11/checksums.md5"));

        let files = FileDiscovery::new(root.to_path_buf()).discover().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("EN2006-11.ZIP"));
    }

    #[test]
    fn test_discover_accepts_standalone_xml() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("notices/2016/112233_2016.xml"));

        let files = FileDiscovery::new(root.to_path_buf()).discover().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].era, Era::FullXml);
    }

    #[test]
    fn test_discover_missing_root_is_an_error() {
        let discovery = FileDiscovery::new(PathBuf::from("/nonexistent/mirror"));
        assert!(discovery.discover().is_err());
    }

    #[test]
    fn test_census_groups_by_era() {
        let files = vec![
            SourceFile {
                path: PathBuf::from("a.zip"),
                era: Era::LegacyLatin1Text,
            },
            SourceFile {
                path: PathBuf::from("b.zip"),
                era: Era::LegacyLatin1Text,
            },
            SourceFile {
                path: PathBuf::from("c.xml"),
                era: Era::FullXml,
            },
        ];
        let census = FileDiscovery::census(&files);
        assert_eq!(census["legacy-latin1-text"], 2);
        assert_eq!(census["full-xml"], 1);
    }
}
