//! # BusLog
//!
//! Business logic documentation for any codebase.
//!
//! BusLog scans a project tree to classify its stack and locate candidate
//! workflow entry points, then keeps a small store of workflow documents next
//! to the code in `.business-logic/`.
//!
//! ## Features
//!
//! - **Stack detection**: Languages by extension, frameworks by import markers
//! - **Entry points**: Route handlers, CLI commands, event listeners, scheduled jobs
//! - **Workflow store**: Markdown documents with a consistent JSON index
//! - **AI prompt**: A deterministic analysis prompt for your coding assistant
//!
//! ## Quick Start
//!
//! ```bash
//! # Create the store
//! buslog init
//!
//! # Generate a prompt for your AI assistant
//! buslog analyze -o prompt.md
//!
//! # Document a workflow by hand
//! buslog add "User Authentication"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::format_push_string)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod analysis;
pub mod patterns;
pub mod prompt;
pub mod scanner;
pub mod store;

// Re-export commonly used types
pub use analysis::{analysis_report, AnalysisReport};
pub use patterns::{Detection, EntryPoint, EntryPointKind, FrameworkKind, PatternMatcher};
pub use prompt::{assemble_prompt, PromptAssembler};
pub use scanner::{FileCounts, Language, ScannedFile, TreeScanner};
pub use store::{
    AnnotationSet, ProjectConfig, StoreError, StoreResult, WorkflowDocument, WorkflowStore,
    WorkflowSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "buslog";
