//! Workflow document structures.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};

/// A workflow document read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    /// Kebab-case key, also the file stem
    pub identifier: String,

    /// Title derived from the identifier
    pub title: String,

    /// Markdown body
    pub body: String,

    /// Creation time, falling back to the modification time
    pub created_at: DateTime<Local>,

    /// Last modification time
    pub modified_at: DateTime<Local>,
}

impl WorkflowDocument {
    /// Load a document file.
    pub fn load(path: &Path, identifier: &str) -> StoreResult<Self> {
        let body = std::fs::read_to_string(path)?;
        let meta = std::fs::metadata(path)?;

        let modified = meta.modified().unwrap_or_else(|_| SystemTime::now());
        let created = meta.created().unwrap_or(modified);

        Ok(Self {
            identifier: identifier.to_string(),
            title: display_title(identifier),
            body,
            created_at: created.into(),
            modified_at: modified.into(),
        })
    }

    /// File name of the document.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.identifier)
    }
}

/// Entry returned when listing the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Display title
    pub name: String,

    /// File name (`<identifier>.md`)
    pub file: String,

    /// Full path on disk
    pub path: PathBuf,
}

/// Derive the durable identifier from a user-supplied name.
///
/// Trims, lower-cases and turns every whitespace character into a hyphen.
pub fn identifier_from_name(name: &str) -> StoreResult<String> {
    let identifier: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();

    if identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier.contains(['/', '\\'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }

    Ok(identifier)
}

/// Title-case an identifier or name: hyphens become spaces and every word
/// starts with an upper-case letter.
pub fn display_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut prev_alpha = false;

    for c in name.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            title.push(c);
            prev_alpha = false;
        }
    }

    title
}

/// Generate the markdown template for a new workflow.
pub fn template(title: &str, date: &str, author: &str) -> String {
    format!(
        r#"# Workflow: {title}

> **Created:** {date} | **Last modified:** {date} | **Author:** {author}

## Description

[What this workflow does from a business perspective]

## Triggers

- **Endpoint**: `[HTTP method] /api/path`
- **Event**: `[event.name]`
- **CLI**: `[command]`

## Components

### Files

- `path/to/file.ext:10-45` - [Role of this file in the workflow]

### External APIs

- **Service Name** (`api.example.com/endpoint`) - [Purpose]

### Internal Services

- `ServiceName` - [Purpose]

### Third-party Libraries

- `package-name` (v1.0.0) - [How it is used]

## Execution Flow

```mermaid
graph TD
    A[Start] --> B{{Decision}}
    B -->|Path 1| C[Action]
    B -->|Path 2| D[Action]
    C --> E[End]
    D --> E
```

## Business Dependencies

### Triggers

- `other-workflow` - [When/Why]

### Required by

- `other-workflow` - [When/Why]

## Notes

_Key points, gotchas and business rules_
"#
    )
}
