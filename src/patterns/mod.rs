//! Lexical pattern matching over project files.
//!
//! Detects frameworks and candidate entry points by searching file contents for
//! the built-in needle tables. Nothing here parses code.
//!
//! [`PatternMatcher`] keeps every decoded file in memory and answers arbitrary
//! queries. [`Detection`] evaluates the fixed tables one file at a time and
//! keeps only the results, which is what a full analysis pass uses.

mod tables;

pub use tables::{EntryPointKind, FrameworkKind, Needle};

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scanner::ScannedFile;
use tables::{Matcher, ENTRY_POINT_TABLE, FRAMEWORK_TABLE};

/// Files larger than this are not searched unless the caller picks another limit.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Reasons a file is left out of content matching.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("{0} is not valid UTF-8")]
    Decode(PathBuf),

    /// The file exceeds the size limit.
    #[error("{path} is too large to search ({size} bytes, limit {limit})")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Decoded text of one scanned file.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Path relative to the project root
    pub relative: String,

    /// UTF-8 contents
    pub text: String,
}

impl SourceText {
    /// Read and decode a scanned file. `max_size` of `None` means no limit.
    pub fn load(file: &ScannedFile, max_size: Option<u64>) -> Result<Self, ScanError> {
        let io_err = |source| ScanError::Io { path: file.path.clone(), source };

        if let Some(limit) = max_size {
            let size = std::fs::metadata(&file.path).map_err(io_err)?.len();
            if size > limit {
                return Err(ScanError::TooLarge { path: file.path.clone(), size, limit });
            }
        }

        let bytes = std::fs::read(&file.path).map_err(io_err)?;
        let text = String::from_utf8(bytes).map_err(|_| ScanError::Decode(file.path.clone()))?;

        Ok(Self { relative: file.relative.clone(), text })
    }
}

/// One occurrence of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub file_path: String,
    pub matched_text: String,
}

/// A detected entry-point candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub kind: EntryPointKind,
    pub file_path: String,
    pub matched_text: String,
}

/// First needle of the group that matches, recorded at its first occurrence.
fn first_entry_point(
    kind: EntryPointKind,
    matchers: &[Matcher],
    source: &SourceText,
) -> Option<EntryPoint> {
    matchers.iter().find_map(|m| m.find(&source.text)).map(|text| EntryPoint {
        kind,
        file_path: source.relative.clone(),
        matched_text: text.to_string(),
    })
}

/// Table results accumulated file by file.
///
/// Texts are not retained, so memory stays proportional to the findings.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    frameworks: BTreeSet<FrameworkKind>,
    entry_points: BTreeMap<EntryPointKind, Vec<EntryPoint>>,
    observed: usize,
}

impl Detection {
    /// Load and observe every scanned file in order, one at a time.
    ///
    /// Unreadable, oversized and non UTF-8 files are skipped.
    pub fn from_files(files: &[ScannedFile], max_size: Option<u64>) -> Self {
        let mut detection = Self::default();
        for file in files {
            match SourceText::load(file, max_size) {
                Ok(source) => detection.observe(&source),
                Err(e) => tracing::debug!(error = %e, "Skipping file"),
            }
        }
        tracing::debug!(observed = detection.observed, total = files.len(), "Detection complete");
        detection
    }

    /// Run both tables over one file.
    pub fn observe(&mut self, source: &SourceText) {
        self.observed += 1;

        for (kind, matchers) in FRAMEWORK_TABLE.iter() {
            if !self.frameworks.contains(kind) && matchers.iter().any(|m| m.is_match(&source.text))
            {
                self.frameworks.insert(*kind);
            }
        }

        for (kind, matchers) in ENTRY_POINT_TABLE.iter() {
            if let Some(entry) = first_entry_point(*kind, matchers, source) {
                self.entry_points.entry(*kind).or_default().push(entry);
            }
        }
    }

    /// Number of files observed so far.
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Detected frameworks, in table order.
    pub fn frameworks(&self) -> Vec<FrameworkKind> {
        self.frameworks.iter().copied().collect()
    }

    /// Entry points of every kind, grouped in table order.
    pub fn entry_points(&self) -> Vec<EntryPoint> {
        self.entry_points.values().flatten().cloned().collect()
    }
}

/// Content matcher over a fixed set of files.
///
/// Files are read once on construction. Search results always follow the order
/// the files were supplied in.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    sources: Vec<SourceText>,
}

impl PatternMatcher {
    /// Load the searchable files out of a scan result, using
    /// [`DEFAULT_MAX_FILE_SIZE`].
    pub fn new(files: &[ScannedFile]) -> Self {
        Self::with_size_limit(files, Some(DEFAULT_MAX_FILE_SIZE))
    }

    /// Load the searchable files, skipping any larger than `max_size` bytes.
    ///
    /// Unreadable and non UTF-8 files are skipped as well.
    pub fn with_size_limit(files: &[ScannedFile], max_size: Option<u64>) -> Self {
        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            match SourceText::load(file, max_size) {
                Ok(source) => sources.push(source),
                Err(e) => tracing::debug!(error = %e, "Skipping file"),
            }
        }
        tracing::debug!(loaded = sources.len(), total = files.len(), "Loaded sources");
        Self::from_sources(sources)
    }

    /// Build a matcher over already-decoded texts.
    pub fn from_sources(sources: Vec<SourceText>) -> Self {
        Self { sources }
    }

    /// Number of searchable files.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Check whether any file carries a marker of the framework.
    pub fn detect(&self, kind: FrameworkKind) -> bool {
        FRAMEWORK_TABLE
            .iter()
            .find(|(k, _)| *k == kind)
            .is_some_and(|(_, matchers)| {
                self.sources.iter().any(|s| matchers.iter().any(|m| m.is_match(&s.text)))
            })
    }

    /// All detected frameworks, in table order.
    pub fn frameworks(&self) -> Vec<FrameworkKind> {
        FrameworkKind::ALL.into_iter().filter(|kind| self.detect(*kind)).collect()
    }

    /// Every occurrence of `pattern` across all files.
    pub fn find_all(&self, pattern: &Regex) -> Vec<PatternMatch> {
        self.sources
            .iter()
            .flat_map(|s| {
                pattern.find_iter(&s.text).map(|m| PatternMatch {
                    file_path: s.relative.clone(),
                    matched_text: m.as_str().to_string(),
                })
            })
            .collect()
    }

    /// Entry points of one kind, at most one per file.
    ///
    /// For each file the first needle that matches wins.
    pub fn entry_points_of(&self, kind: EntryPointKind) -> Vec<EntryPoint> {
        let Some((_, matchers)) = ENTRY_POINT_TABLE.iter().find(|(k, _)| *k == kind) else {
            return Vec::new();
        };

        self.sources.iter().filter_map(|s| first_entry_point(kind, matchers, s)).collect()
    }

    /// Entry points of every kind, grouped in table order.
    pub fn entry_points(&self) -> Vec<EntryPoint> {
        EntryPointKind::ALL.into_iter().flat_map(|kind| self.entry_points_of(kind)).collect()
    }
}
