//! Annotations attached to workflow documents.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::StoreResult;
use super::lock::write_file_atomic;

/// Ordered annotation records of one workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// Identifier of the annotated workflow
    pub workflow: String,

    /// Opaque records, in insertion order
    pub annotations: Vec<Value>,
}

impl AnnotationSet {
    /// Load annotations from disk. A missing file is an empty set.
    pub fn load(path: &Path, workflow: &str) -> StoreResult<Self> {
        if !path.exists() {
            return Ok(Self { workflow: workflow.to_string(), annotations: Vec::new() });
        }

        let content = std::fs::read_to_string(path)?;
        let annotations: Vec<Value> = serde_json::from_str(&content)?;
        Ok(Self { workflow: workflow.to_string(), annotations })
    }

    /// Save the records as a pretty-printed JSON array.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&self.annotations)?;
        write_file_atomic(path, &content)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
