//! Durable workflow store.
//!
//! Everything lives under `<project>/.business-logic`:
//!
//! - `config.json` - project configuration and workflow index
//! - `index.md` - rendered summary
//! - `workflows/<id>.md` - one document per workflow
//! - `annotations/<id>.json` - optional annotations per workflow
//!
//! Nothing is cached between calls; every operation re-reads the files.
//! Mutating calls are serialized per project root inside the process, and
//! every write replaces its file atomically.

mod annotations;
mod config;
mod document;
mod error;
mod lock;

pub use annotations::AnnotationSet;
pub use config::{Metadata, ProjectConfig, Settings, SCHEMA_VERSION};
pub use document::{
    display_title, identifier_from_name, WorkflowDocument, WorkflowSummary,
};
pub use error::{StoreError, StoreResult};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;

use crate::scanner::TreeScanner;
use lock::{root_lock, write_file_atomic};

/// Name of the store folder inside a project.
pub const STORE_DIR: &str = ".business-logic";

const WORKFLOWS_DIR: &str = "workflows";
const ANNOTATIONS_DIR: &str = "annotations";
const CONFIG_FILE: &str = "config.json";
const INDEX_FILE: &str = "index.md";

/// Handle to the workflow store of one project.
#[derive(Debug, Clone)]
pub struct WorkflowStore {
    project_root: PathBuf,
    store_path: PathBuf,
    workflows_path: PathBuf,
    annotations_path: PathBuf,
    config_path: PathBuf,
    index_path: PathBuf,
}

impl WorkflowStore {
    /// Create a handle for the project at `project_root`.
    pub fn new(project_root: &Path) -> Self {
        let store_path = project_root.join(STORE_DIR);
        Self {
            project_root: project_root.to_path_buf(),
            workflows_path: store_path.join(WORKFLOWS_DIR),
            annotations_path: store_path.join(ANNOTATIONS_DIR),
            config_path: store_path.join(CONFIG_FILE),
            index_path: store_path.join(INDEX_FILE),
            store_path,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn workflows_path(&self) -> &Path {
        &self.workflows_path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Check if the store folder, config and workflows folder all exist.
    pub fn is_initialized(&self) -> bool {
        self.store_path.is_dir() && self.config_path.is_file() && self.workflows_path.is_dir()
    }

    /// Create the store and write a fresh configuration.
    ///
    /// Fails with [`StoreError::AlreadyInitialized`] unless `force` is set or the
    /// store does not exist yet. Documents already on disk are kept and the
    /// workflow index is rebuilt from them.
    pub fn initialize(
        &self,
        project_name: Option<&str>,
        force: bool,
    ) -> StoreResult<ProjectConfig> {
        let lock = root_lock(&self.project_root);
        let _guard = lock.lock();

        if self.is_initialized() && !force {
            return Err(StoreError::AlreadyInitialized);
        }

        if !self.project_root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("project root {} is not a directory", self.project_root.display()),
            )
            .into());
        }

        fs::create_dir_all(&self.workflows_path)?;

        let name = project_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| self.default_project_name(), str::to_string);

        let languages = TreeScanner::new(&self.project_root)
            .language_ranking()
            .iter()
            .map(|l| l.language.display_name().to_string())
            .collect();

        let mut config = ProjectConfig::new(name, languages);
        config.workflow_names = self.document_identifiers()?;

        self.write_config(&config)?;

        tracing::info!(
            project = %config.name,
            workflows = config.workflow_names.len(),
            force,
            "Initialized workflow store"
        );

        Ok(config)
    }

    /// Create a new workflow document from the template.
    pub fn add_workflow(&self, name: &str) -> StoreResult<WorkflowDocument> {
        let identifier = identifier_from_name(name)?;

        let lock = root_lock(&self.project_root);
        let _guard = lock.lock();

        self.require_initialized()?;
        let mut config = self.load_config()?;

        if let Some((existing, _)) = self.find_document(&identifier)? {
            return Err(StoreError::DocumentAlreadyExists(existing));
        }

        let path = self.workflows_path.join(format!("{identifier}.md"));
        let today = Local::now().format("%Y-%m-%d").to_string();
        let content = document::template(&display_title(&identifier), &today, "");
        write_file_atomic(&path, &content)?;

        if !config.has_workflow(&identifier) {
            config.workflow_names.push(identifier.clone());
        }
        if let Err(e) = self.write_config(&config) {
            if let Err(cleanup) = fs::remove_file(&path) {
                tracing::warn!(
                    path = %path.display(),
                    error = %cleanup,
                    "Failed to remove workflow after config write error"
                );
            }
            return Err(e);
        }

        tracing::info!(workflow = %identifier, "Created workflow");

        WorkflowDocument::load(&path, &identifier)
    }

    /// List documents found in the workflows folder, sorted by title.
    pub fn list_workflows(&self) -> StoreResult<Vec<WorkflowSummary>> {
        self.require_initialized()?;

        let mut workflows: Vec<WorkflowSummary> = self
            .document_files()?
            .into_iter()
            .map(|(identifier, path)| WorkflowSummary {
                name: display_title(&identifier),
                file: format!("{identifier}.md"),
                path,
            })
            .collect();

        workflows.sort_by(|a, b| {
            a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.file.cmp(&b.file))
        });

        Ok(workflows)
    }

    /// Read one document.
    pub fn read_workflow(&self, identifier: &str) -> StoreResult<WorkflowDocument> {
        self.require_initialized()?;
        let (identifier, path) = self.require_document(identifier)?;
        WorkflowDocument::load(&path, &identifier)
    }

    /// Replace the body of an existing document.
    pub fn update_workflow(&self, identifier: &str, body: &str) -> StoreResult<WorkflowDocument> {
        let lock = root_lock(&self.project_root);
        let _guard = lock.lock();

        self.require_initialized()?;
        let (identifier, path) = self.require_document(identifier)?;
        write_file_atomic(&path, body)?;

        tracing::info!(workflow = %identifier, bytes = body.len(), "Updated workflow");

        WorkflowDocument::load(&path, &identifier)
    }

    /// Annotations of a document; empty when none were saved.
    pub fn annotations(&self, identifier: &str) -> StoreResult<AnnotationSet> {
        self.require_initialized()?;
        let (identifier, _) = self.require_document(identifier)?;
        AnnotationSet::load(&self.annotation_path(&identifier), &identifier)
    }

    /// Replace the annotations of a document.
    pub fn save_annotations(
        &self,
        identifier: &str,
        annotations: Vec<Value>,
    ) -> StoreResult<AnnotationSet> {
        let lock = root_lock(&self.project_root);
        let _guard = lock.lock();

        self.require_initialized()?;
        let (identifier, _) = self.require_document(identifier)?;

        fs::create_dir_all(&self.annotations_path)?;
        let set = AnnotationSet { workflow: identifier, annotations };
        set.save(&self.annotation_path(&set.workflow))?;

        tracing::info!(workflow = %set.workflow, count = set.len(), "Saved annotations");

        Ok(set)
    }

    /// Rebuild the workflow index from the documents on disk.
    pub fn sync_index(&self) -> StoreResult<ProjectConfig> {
        let lock = root_lock(&self.project_root);
        let _guard = lock.lock();

        self.require_initialized()?;
        let mut config = self.load_config()?;
        let identifiers = self.document_identifiers()?;

        if config.workflow_names != identifiers {
            tracing::info!(
                before = config.workflow_names.len(),
                after = identifiers.len(),
                "Resynchronized workflow index"
            );
            config.workflow_names = identifiers;
            self.write_config(&config)?;
        }

        Ok(config)
    }

    /// Current configuration, or `None` when the store does not exist.
    pub fn get_config(&self) -> StoreResult<Option<ProjectConfig>> {
        if !self.config_path.exists() {
            return Ok(None);
        }
        self.load_config().map(Some)
    }

    /// Raw configuration JSON, or an empty object when the store does not exist.
    pub fn config_value(&self) -> StoreResult<Value> {
        if !self.config_path.exists() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        let content = fs::read_to_string(&self.config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn require_initialized(&self) -> StoreResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    fn load_config(&self) -> StoreResult<ProjectConfig> {
        ProjectConfig::load(&self.config_path)
    }

    /// Persist the config, then re-render the index page.
    ///
    /// Only the config write can fail the call. The index page is derived from
    /// the config and is rebuilt on the next successful write.
    fn write_config(&self, config: &ProjectConfig) -> StoreResult<()> {
        write_file_atomic(&self.config_path, &config.to_json()?)?;

        if let Err(e) = write_file_atomic(&self.index_path, &render_index(config)) {
            tracing::warn!(path = %self.index_path.display(), error = %e, "Failed to render index");
        }

        Ok(())
    }

    fn default_project_name(&self) -> String {
        fs::canonicalize(&self.project_root)
            .ok()
            .as_deref()
            .unwrap_or(&self.project_root)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    fn annotation_path(&self, identifier: &str) -> PathBuf {
        self.annotations_path.join(format!("{identifier}.json"))
    }

    /// `(identifier, path)` of every `*.md` file, sorted by identifier.
    fn document_files(&self) -> StoreResult<Vec<(String, PathBuf)>> {
        if !self.workflows_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.workflows_path)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }

        files.sort();
        Ok(files)
    }

    fn document_identifiers(&self) -> StoreResult<Vec<String>> {
        Ok(self.document_files()?.into_iter().map(|(id, _)| id).collect())
    }

    /// Case-insensitive lookup by identifier.
    fn find_document(&self, identifier: &str) -> StoreResult<Option<(String, PathBuf)>> {
        let wanted = identifier.to_lowercase();
        Ok(self.document_files()?.into_iter().find(|(id, _)| id.to_lowercase() == wanted))
    }

    fn require_document(&self, identifier: &str) -> StoreResult<(String, PathBuf)> {
        let normalized = identifier_from_name(identifier)?;
        self.find_document(&normalized)?.ok_or(StoreError::DocumentNotFound(normalized))
    }
}

/// Render the `index.md` summary page.
fn render_index(config: &ProjectConfig) -> String {
    let languages = if config.languages.is_empty() {
        "Not detected".to_string()
    } else {
        config.languages.join(", ")
    };

    let mut md = format!("# {} Business Logic\n\n", config.name);
    md.push_str(&format!("- **Languages**: {languages}\n"));
    md.push_str(&format!("- **Workflows**: {}\n\n", config.workflow_names.len()));

    md.push_str("## Workflows\n\n");
    if config.workflow_names.is_empty() {
        md.push_str("_No workflows documented yet. Run `buslog add <name>` to create one._\n");
    }
    for id in &config.workflow_names {
        md.push_str(&format!("- [{}](workflows/{id}.md)\n", display_title(id)));
    }

    md
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn initialized() -> (TempDir, WorkflowStore) {
        let temp = TempDir::new().unwrap();
        let store = WorkflowStore::new(temp.path());
        store.initialize(Some("demo"), false).unwrap();
        (temp, store)
    }

    #[test]
    fn test_initialize_creates_layout() {
        let (_temp, store) = initialized();
        assert!(store.is_initialized());
        assert!(store.config_path().is_file());
        assert!(store.store_path().join("index.md").is_file());

        let config = store.get_config().unwrap().unwrap();
        assert_eq!(config.name, "demo");
        assert!(config.workflow_names.is_empty());
    }

    #[test]
    fn test_uninitialized_store() {
        let temp = TempDir::new().unwrap();
        let store = WorkflowStore::new(temp.path());

        assert!(!store.is_initialized());
        assert!(store.get_config().unwrap().is_none());
        assert_eq!(store.config_value().unwrap(), json!({}));
        assert!(matches!(store.add_workflow("x"), Err(StoreError::NotInitialized)));
        assert!(matches!(store.list_workflows(), Err(StoreError::NotInitialized)));
    }

    #[test]
    fn test_languages_recorded_at_init() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "").unwrap();
        fs::write(temp.path().join("b.py"), "").unwrap();
        fs::write(temp.path().join("c.go"), "").unwrap();

        let config = WorkflowStore::new(temp.path()).initialize(None, false).unwrap();
        assert_eq!(config.languages, vec!["Python", "Go"]);
    }

    #[test]
    fn test_default_name_is_directory_name() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("shop-api");
        fs::create_dir(&project).unwrap();

        let config = WorkflowStore::new(&project).initialize(None, false).unwrap();
        assert_eq!(config.name, "shop-api");
    }

    #[test]
    fn test_initialize_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let store = WorkflowStore::new(&temp.path().join("nope"));
        assert!(matches!(store.initialize(None, false), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_add_and_read_workflow() {
        let (_temp, store) = initialized();

        let doc = store.add_workflow("Order Checkout").unwrap();
        assert_eq!(doc.identifier, "order-checkout");
        assert_eq!(doc.title, "Order Checkout");
        assert!(doc.body.starts_with("# Workflow: Order Checkout"));

        let read = store.read_workflow("order-checkout").unwrap();
        assert_eq!(read.body, doc.body);

        let by_name = store.read_workflow("Order Checkout").unwrap();
        assert_eq!(by_name.identifier, "order-checkout");
    }

    #[test]
    fn test_duplicate_is_case_insensitive() {
        let (_temp, store) = initialized();
        fs::write(store.workflows_path().join("Payments.md"), "# manual").unwrap();

        let err = store.add_workflow("payments").unwrap_err();
        assert!(matches!(err, StoreError::DocumentAlreadyExists(id) if id == "Payments"));
    }

    #[test]
    fn test_update_workflow() {
        let (_temp, store) = initialized();
        store.add_workflow("refunds").unwrap();

        let doc = store.update_workflow("refunds", "# Workflow: Refunds\n\nUpdated.").unwrap();
        assert_eq!(doc.body, "# Workflow: Refunds\n\nUpdated.");
        assert!(matches!(
            store.update_workflow("missing", "x"),
            Err(StoreError::DocumentNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_annotations_round_trip() {
        let (_temp, store) = initialized();
        store.add_workflow("signup").unwrap();

        assert!(store.annotations("signup").unwrap().is_empty());

        store.save_annotations("signup", vec![json!({"text": "check rate limit"})]).unwrap();
        let set = store.annotations("signup").unwrap();
        assert_eq!(set.annotations, vec![json!({"text": "check rate limit"})]);

        assert!(matches!(
            store.save_annotations("ghost", vec![]),
            Err(StoreError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_sync_index_repairs_drift() {
        let (_temp, store) = initialized();
        store.add_workflow("a").unwrap();
        fs::write(store.workflows_path().join("b.md"), "# B").unwrap();
        fs::remove_file(store.workflows_path().join("a.md")).unwrap();

        let config = store.sync_index().unwrap();
        assert_eq!(config.workflow_names, vec!["b"]);
    }

    #[test]
    fn test_malformed_config_propagates() {
        let (_temp, store) = initialized();
        fs::write(store.config_path(), "not json").unwrap();

        assert!(matches!(store.get_config(), Err(StoreError::Json(_))));
        assert!(matches!(store.add_workflow("x"), Err(StoreError::Json(_))));
        assert!(!store.workflows_path().join("x.md").exists());
    }

    #[test]
    fn test_render_index_lists_workflows() {
        let mut config = ProjectConfig::new("shop", vec!["Rust".to_string()]);
        config.workflow_names = vec!["user-login".to_string()];

        let md = render_index(&config);
        assert!(md.starts_with("# shop Business Logic"));
        assert!(md.contains("- [User Login](workflows/user-login.md)"));
        assert!(md.contains("**Languages**: Rust"));
    }

    #[test]
    fn test_unwritable_index_keeps_config_and_documents_in_step() {
        let (_temp, store) = initialized();
        let index = store.store_path().join("index.md");
        fs::remove_file(&index).unwrap();
        fs::create_dir(&index).unwrap();

        store.add_workflow("ghost").unwrap();

        assert!(store.workflows_path().join("ghost.md").is_file());
        let config = store.get_config().unwrap().unwrap();
        assert_eq!(config.workflow_names, vec!["ghost"]);
        assert_eq!(config.workflow_names, store.document_identifiers().unwrap());
    }

    #[test]
    fn test_failed_config_write_removes_new_document() {
        let (_temp, store) = initialized();
        let before = fs::read(store.config_path()).unwrap();
        fs::create_dir(store.store_path().join(".config.json.tmp")).unwrap();

        assert!(matches!(store.add_workflow("ghost"), Err(StoreError::Io(_))));

        assert!(!store.workflows_path().join("ghost.md").exists());
        assert_eq!(fs::read(store.config_path()).unwrap(), before);
        assert!(store.document_identifiers().unwrap().is_empty());
    }

    #[test]
    fn test_add_keeps_unknown_config_keys() {
        let (_temp, store) = initialized();
        let mut value = store.config_value().unwrap();
        value["settings"]["language"] = json!("fr");
        value["metadata"]["license"] = json!("MIT");
        value["team"] = json!("payments");
        fs::write(store.config_path(), serde_json::to_string_pretty(&value).unwrap()).unwrap();

        store.add_workflow("checkout").unwrap();
        store.sync_index().unwrap();

        let after = store.config_value().unwrap();
        assert_eq!(after["settings"]["language"], "fr");
        assert_eq!(after["settings"]["mermaid_theme"], "default");
        assert_eq!(after["metadata"]["license"], "MIT");
        assert_eq!(after["team"], "payments");
        assert_eq!(after["workflows"], json!(["checkout"]));
    }
}
