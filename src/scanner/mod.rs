//! Project tree scanning.
//!
//! Walks a project directory, skips dependency caches and build output, and
//! classifies every remaining file by language and category.

mod language;

pub use language::Language;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

/// A regular file retained by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Absolute (root-joined) path on disk
    pub path: PathBuf,

    /// Path relative to the scanned root, `/` separated
    pub relative: String,

    /// Language detected from the extension
    pub language: Option<Language>,

    /// Extension is a known source extension
    pub is_source: bool,

    /// File name or an ancestor directory mentions "test"
    pub is_test: bool,

    /// Extension is a known configuration extension
    pub is_config: bool,
}

impl ScannedFile {
    fn classify(path: PathBuf, relative: &Path) -> Self {
        let language = Language::from_path(&path);
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let is_source = language::is_source_extension(ext);
        let is_config = language::is_config_extension(ext);

        let is_test = relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().to_lowercase().contains("test"));

        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Self { path, relative, language, is_source, is_test, is_config }
    }
}

/// File counts by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    pub total: usize,
    pub source: usize,
    pub test: usize,
    pub config: usize,
}

impl FileCounts {
    /// Tally the categories of a scanned file list.
    pub fn from_files(files: &[ScannedFile]) -> Self {
        let mut counts = Self::default();
        for file in files {
            counts.total += 1;
            counts.source += usize::from(file.is_source);
            counts.test += usize::from(file.is_test);
            counts.config += usize::from(file.is_config);
        }
        counts
    }
}

/// A language and the number of files written in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: Language,
    pub count: usize,
}

/// Rank languages by file count, most common first.
///
/// Ties keep table order.
pub fn language_ranking(files: &[ScannedFile]) -> Vec<LanguageCount> {
    let mut counts: HashMap<Language, usize> = HashMap::new();
    for lang in files.iter().filter_map(|f| f.language) {
        *counts.entry(lang).or_insert(0) += 1;
    }

    let mut ranking: Vec<LanguageCount> =
        counts.into_iter().map(|(language, count)| LanguageCount { language, count }).collect();
    ranking.sort_by(|a, b| b.count.cmp(&a.count).then(a.language.cmp(&b.language)));
    ranking
}

/// Directory-level scanner for a project root.
#[derive(Debug, Clone)]
pub struct TreeScanner {
    /// Root directory to scan
    root: PathBuf,
}

impl TreeScanner {
    /// Create a new scanner for the given directory.
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    /// Get the scanned root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and return every retained file in file-name order.
    ///
    /// Entries that cannot be read are skipped.
    pub fn scan(&self) -> Vec<ScannedFile> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative.to_path_buf();
            files.push(ScannedFile::classify(entry.into_path(), &relative));
        }

        tracing::debug!(root = %self.root.display(), count = files.len(), "Scanned tree");
        files
    }

    /// Rank languages found under the root.
    pub fn language_ranking(&self) -> Vec<LanguageCount> {
        language_ranking(&self.scan())
    }

    /// Count files under the root by category.
    pub fn file_counts(&self) -> FileCounts {
        FileCounts::from_files(&self.scan())
    }
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && should_skip_dir(&entry.file_name().to_string_lossy())
}

/// Check if a directory should be skipped during scanning.
pub fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        ".git"
            | ".hg"
            | ".svn"
            | ".venv"
            | "venv"
            | "node_modules"
            | "__pycache__"
            | ".pytest_cache"
            | "dist"
            | "build"
            | "target"
            | crate::store::STORE_DIR
    )
}
