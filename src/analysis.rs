//! Codebase analysis report.
//!
//! Combines a tree scan with content matching into one immutable snapshot of
//! the project's stack and entry points.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::patterns::{Detection, EntryPoint, FrameworkKind, DEFAULT_MAX_FILE_SIZE};
use crate::scanner::{language_ranking, FileCounts, LanguageCount, TreeScanner};

/// Result of one scan pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Languages ranked by file count
    pub languages: Vec<LanguageCount>,

    /// Detected frameworks, in table order
    pub frameworks: Vec<FrameworkKind>,

    /// File statistics
    pub file_counts: FileCounts,

    /// Entry-point candidates grouped by kind
    pub entry_points: Vec<EntryPoint>,
}

impl AnalysisReport {
    /// Build a report for the tree under `root`.
    pub fn build(root: &Path) -> Self {
        Self::build_with_size_limit(root, Some(DEFAULT_MAX_FILE_SIZE))
    }

    /// Build a report, searching only files up to `max_size` bytes.
    ///
    /// Files are matched one at a time and their text is dropped right after.
    pub fn build_with_size_limit(root: &Path, max_size: Option<u64>) -> Self {
        let scanner = TreeScanner::new(root);
        let files = scanner.scan();
        let detection = Detection::from_files(&files, max_size);

        let report = Self {
            languages: language_ranking(&files),
            frameworks: detection.frameworks(),
            file_counts: FileCounts::from_files(&files),
            entry_points: detection.entry_points(),
        };

        tracing::debug!(
            root = %scanner.root().display(),
            files = report.file_counts.total,
            languages = report.languages.len(),
            frameworks = report.frameworks.len(),
            entry_points = report.entry_points.len(),
            "Analysis complete"
        );

        report
    }

    /// Language display names, most common first.
    pub fn language_names(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.language.display_name().to_string()).collect()
    }

    /// Framework display names.
    pub fn framework_names(&self) -> Vec<String> {
        self.frameworks.iter().map(|f| f.display_name().to_string()).collect()
    }

    /// Render as a short plain-text summary.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Files: {} total", self.file_counts.total);
        let _ = writeln!(
            out,
            "  source: {}, test: {}, config: {}",
            self.file_counts.source, self.file_counts.test, self.file_counts.config
        );

        out.push_str("\nLanguages:\n");
        if self.languages.is_empty() {
            out.push_str("  (none)\n");
        }
        for lang in &self.languages {
            let _ = writeln!(out, "  - {} ({})", lang.language, lang.count);
        }

        out.push_str("\nFrameworks:\n");
        if self.frameworks.is_empty() {
            out.push_str("  (none)\n");
        }
        for name in self.framework_names() {
            let _ = writeln!(out, "  - {name}");
        }

        let _ = writeln!(out, "\nEntry points: {}", self.entry_points.len());
        for entry in &self.entry_points {
            let _ = writeln!(out, "  - [{}] {}: {}", entry.kind, entry.file_path, entry.matched_text);
        }

        out
    }
}

/// Analyze the project under `root`.
pub fn analysis_report(root: &Path) -> AnalysisReport {
    AnalysisReport::build(root)
}
