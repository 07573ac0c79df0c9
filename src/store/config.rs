//! Project configuration record.
//!
//! Persisted as pretty-printed JSON in `config.json` under the store root.

use std::path::Path;

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::StoreResult;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    #[serde(rename = "project_name")]
    pub name: String,

    /// Schema version
    #[serde(rename = "version")]
    pub schema_version: String,

    /// Creation time (ISO-8601)
    pub created_at: String,

    /// Languages, most common first
    pub languages: Vec<String>,

    /// Detected frameworks
    pub frameworks: Vec<String>,

    /// Identifiers of every workflow document in the store
    #[serde(rename = "workflows")]
    pub workflow_names: Vec<String>,

    /// Viewer settings
    pub settings: Settings,

    /// Repository metadata
    pub metadata: Metadata,

    /// Keys written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Refresh detection automatically
    pub auto_detect: bool,

    /// Mermaid diagram theme
    pub mermaid_theme: String,

    /// Show line numbers in code references
    pub show_line_numbers: bool,

    /// Collapse sections by default
    pub collapse_by_default: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_detect: false,
            mermaid_theme: "default".to_string(),
            show_line_numbers: true,
            collapse_by_default: false,
            extra: Map::new(),
        }
    }
}

/// Repository metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Repository URL
    pub repository: String,

    /// Main branch name
    pub main_branch: String,

    /// Document authors
    pub authors: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            repository: String::new(),
            main_branch: "main".to_string(),
            authors: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl ProjectConfig {
    /// Create a fresh configuration stamped with the current time.
    pub fn new(name: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            languages,
            frameworks: Vec::new(),
            workflow_names: Vec::new(),
            settings: Settings::default(),
            metadata: Metadata::default(),
            extra: Map::new(),
        }
    }

    /// Load from a config.json file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether the index lists this identifier.
    pub fn has_workflow(&self, identifier: &str) -> bool {
        self.workflow_names.iter().any(|w| w == identifier)
    }
}
