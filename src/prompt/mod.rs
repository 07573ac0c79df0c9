//! Analysis prompt assembly.
//!
//! Renders detected entry points and the project configuration into a
//! markdown prompt for an AI coding assistant. Rendering is deterministic:
//! identical inputs always produce identical bytes.

mod template;

use std::path::Path;

use crate::analysis::analysis_report;
use crate::patterns::{EntryPoint, EntryPointKind};
use crate::store::{ProjectConfig, StoreResult, WorkflowStore};

/// Maximum files listed per entry-point kind.
pub const MAX_FILES_PER_GROUP: usize = 5;

/// Rendered in place of the entry-point listing when nothing was detected.
pub const NO_ENTRY_POINTS: &str =
    "_No entry points detected. You'll need to explore the codebase manually._";

/// Prompt renderer bound to one project's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAssembler {
    project_name: String,
    languages: Vec<String>,
    workflows: Vec<String>,
}

impl PromptAssembler {
    /// Take the project context from `config`, or fall back to `fallback_name`
    /// when the store has no configuration.
    pub fn new(config: Option<&ProjectConfig>, fallback_name: &str) -> Self {
        match config {
            Some(config) => Self {
                project_name: config.name.clone(),
                languages: config.languages.clone(),
                workflows: config.workflow_names.clone(),
            },
            None => Self {
                project_name: fallback_name.to_string(),
                languages: Vec::new(),
                workflows: Vec::new(),
            },
        }
    }

    /// Render the full prompt.
    pub fn render(&self, entry_points: &[EntryPoint]) -> String {
        let languages = if self.languages.is_empty() {
            "Auto-detect".to_string()
        } else {
            self.languages.join(", ")
        };

        let workflows = if self.workflows.is_empty() {
            "None yet".to_string()
        } else {
            self.workflows.iter().map(|w| format!("`{w}`")).collect::<Vec<_>>().join(", ")
        };

        template::render(&template::Context {
            project_name: &self.project_name,
            languages: &languages,
            workflows: &workflows,
            entry_count: entry_points.len(),
            entry_points: &format_entry_points(entry_points),
        })
    }
}

/// Format entry points grouped by kind, capped at [`MAX_FILES_PER_GROUP`] files.
pub fn format_entry_points(entry_points: &[EntryPoint]) -> String {
    if entry_points.is_empty() {
        return NO_ENTRY_POINTS.to_string();
    }

    let mut lines = Vec::new();

    for kind in EntryPointKind::ALL {
        let mut files: Vec<&str> = Vec::new();
        for entry in entry_points.iter().filter(|e| e.kind == kind) {
            if !files.contains(&entry.file_path.as_str()) {
                files.push(&entry.file_path);
            }
        }

        if files.is_empty() {
            continue;
        }

        lines.push(format!("### {kind}"));
        for file in files.iter().take(MAX_FILES_PER_GROUP) {
            lines.push(format!("- `{file}`"));
        }
        if files.len() > MAX_FILES_PER_GROUP {
            lines.push(format!("- _(+{} more)_", files.len() - MAX_FILES_PER_GROUP));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Analyze the project at `root` and render its prompt.
pub fn assemble_prompt(root: &Path) -> StoreResult<String> {
    let store = WorkflowStore::new(root);
    let config = store.get_config()?;
    let report = analysis_report(root);

    let fallback = std::fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());

    Ok(PromptAssembler::new(config.as_ref(), &fallback).render(&report.entry_points))
}
