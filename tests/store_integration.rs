//! Integration tests for the workflow store and the analysis pipeline.

use std::fs;
use std::path::Path;

use buslog::store::{StoreError, WorkflowStore};
use buslog::{analysis_report, assemble_prompt, EntryPointKind, FileCounts, TreeScanner};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn init_store(temp: &TempDir) -> WorkflowStore {
    let store = WorkflowStore::new(temp.path());
    store.initialize(Some("demo"), false).unwrap();
    store
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_reinit_without_force_leaves_config_untouched() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);
    store.add_workflow("checkout").unwrap();

    let before = fs::read(store.config_path()).unwrap();

    let err = store.initialize(Some("other"), false).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyInitialized));
    assert_eq!(fs::read(store.config_path()).unwrap(), before);
}

#[test]
fn test_force_reinit_keeps_existing_documents_indexed() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);
    store.add_workflow("checkout").unwrap();
    store.add_workflow("Account Signup").unwrap();

    let config = store.initialize(Some("renamed"), true).unwrap();
    assert_eq!(config.name, "renamed");
    assert_eq!(config.workflow_names, vec!["account-signup", "checkout"]);

    let listed: Vec<_> = store.list_workflows().unwrap().into_iter().map(|w| w.file).collect();
    assert_eq!(listed, vec!["account-signup.md", "checkout.md"]);
}

#[test]
fn test_config_json_layout() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);

    let value = store.config_value().unwrap();
    assert_eq!(value["project_name"], "demo");
    assert_eq!(value["version"], "0.1.0");
    assert!(value["created_at"].is_string());
    assert!(value["workflows"].as_array().unwrap().is_empty());
    assert_eq!(value["settings"]["auto_detect"], false);
    assert_eq!(value["settings"]["collapse_by_default"], false);
    assert_eq!(value["metadata"]["repository"], "");
    assert!(value["metadata"]["authors"].as_array().unwrap().is_empty());
}

// ============================================================================
// Workflow documents
// ============================================================================

#[test]
fn test_add_user_authentication() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);

    let doc = store.add_workflow("User Authentication").unwrap();
    assert_eq!(doc.title, "User Authentication");
    assert!(temp.path().join(".business-logic/workflows/user-authentication.md").is_file());

    let workflows = store.list_workflows().unwrap();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].name, "User Authentication");
    assert_eq!(workflows[0].file, "user-authentication.md");
}

#[test]
fn test_duplicate_add_fails_and_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);

    store.add_workflow("User Authentication").unwrap();
    let doc_path = store.workflows_path().join("user-authentication.md");
    store.update_workflow("user-authentication", "# custom body").unwrap();
    let config_before = fs::read(store.config_path()).unwrap();

    let err = store.add_workflow("  user AUTHENTICATION ").unwrap_err();
    assert!(matches!(err, StoreError::DocumentAlreadyExists(id) if id == "user-authentication"));

    assert_eq!(fs::read_to_string(&doc_path).unwrap(), "# custom body");
    assert_eq!(fs::read(store.config_path()).unwrap(), config_before);
}

#[test]
fn test_identifier_appears_exactly_once() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);

    for name in ["Billing", "Order Checkout", "account-signup"] {
        store.add_workflow(name).unwrap();
    }
    let _ = store.add_workflow("billing");

    let config = store.get_config().unwrap().unwrap();
    let listed = store.list_workflows().unwrap();

    for id in ["billing", "order-checkout", "account-signup"] {
        let file = format!("{id}.md");
        assert_eq!(config.workflow_names.iter().filter(|w| *w == id).count(), 1, "{id}");
        assert_eq!(listed.iter().filter(|w| w.file == file).count(), 1, "{id}");
    }
}

#[test]
fn test_list_sorted_by_title_case_insensitive() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);

    store.add_workflow("zebra import").unwrap();
    store.add_workflow("Alpha Export").unwrap();
    write(store.workflows_path(), "middle.md", "# hand written");
    write(store.workflows_path(), "notes.txt", "ignored");

    let names: Vec<_> = store.list_workflows().unwrap().into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["Alpha Export", "Middle", "Zebra Import"]);
}

#[test]
fn test_read_missing_document() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);

    let err = store.read_workflow("nothing-here").unwrap_err();
    assert!(matches!(err, StoreError::DocumentNotFound(id) if id == "nothing-here"));
}

#[test]
fn test_annotations_stored_separately() {
    let temp = TempDir::new().unwrap();
    let store = init_store(&temp);
    store.add_workflow("payments").unwrap();

    let records = vec![serde_json::json!({"step": 2, "text": "idempotency key"})];
    store.save_annotations("payments", records.clone()).unwrap();

    let raw = fs::read_to_string(temp.path().join(".business-logic/annotations/payments.json"))
        .unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, records);

    let doc = store.read_workflow("payments").unwrap();
    assert!(!doc.body.contains("idempotency key"));
}

#[test]
fn test_handles_share_state_through_disk() {
    let temp = TempDir::new().unwrap();
    init_store(&temp);

    WorkflowStore::new(temp.path()).add_workflow("first").unwrap();
    WorkflowStore::new(temp.path()).add_workflow("second").unwrap();

    let config = WorkflowStore::new(temp.path()).get_config().unwrap().unwrap();
    assert_eq!(config.workflow_names, vec!["first", "second"]);
}

#[test]
fn test_concurrent_adds_keep_index_consistent() {
    let temp = TempDir::new().unwrap();
    init_store(&temp);
    let root = temp.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let root = root.clone();
            std::thread::spawn(move || {
                WorkflowStore::new(&root).add_workflow(&format!("flow {i}")).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = WorkflowStore::new(&root);
    let mut names = store.get_config().unwrap().unwrap().workflow_names;
    names.sort();
    let expected: Vec<_> = (0..8).map(|i| format!("flow-{i}")).collect();
    assert_eq!(names, expected);
}

// ============================================================================
// Scanning and prompt
// ============================================================================

#[test]
fn test_scanner_never_returns_excluded_or_foreign_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/app.py", "");
    write(temp.path(), ".git/HEAD", "");
    write(temp.path(), "web/node_modules/react/index.js", "");
    write(temp.path(), "pkg/dist/bundle.js", "");
    write(temp.path(), ".venv/lib/site.py", "");
    init_store(&temp);

    let files = TreeScanner::new(temp.path()).scan();
    assert_eq!(files.len(), 1);
    for file in &files {
        assert!(file.path.starts_with(temp.path()));
        assert!(!file.relative.split('/').any(buslog::scanner::should_skip_dir));
    }
}

#[test]
fn test_report_scenario() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.py", "x = 1");
    write(temp.path(), "b.js", "let y = 2;");
    write(temp.path(), "tests/c.py", "assert True");

    let report = analysis_report(temp.path());
    assert_eq!(report.file_counts, FileCounts { total: 3, source: 3, test: 1, config: 0 });
    assert_eq!(report.language_names(), vec!["Python", "JavaScript"]);
}

#[test]
fn test_entry_points_one_record_per_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "one.js", "app.get('/a', a);\napp.get('/b', b);");
    write(temp.path(), "two.js", "app.post('/c', c);");

    let report = analysis_report(temp.path());
    let api: Vec<_> =
        report.entry_points.iter().filter(|e| e.kind == EntryPointKind::ApiEndpoint).collect();
    assert_eq!(api.len(), 2);
    assert_eq!(api[0].file_path, "one.js");
    assert_eq!(api[1].file_path, "two.js");
}

#[test]
fn test_prompt_is_byte_stable_and_capped() {
    let temp = TempDir::new().unwrap();
    for i in 0..7 {
        write(temp.path(), &format!("routes/r{i}.py"), "@router.get('/items')\ndef list(): ...");
    }
    init_store(&temp);

    let first = assemble_prompt(temp.path()).unwrap();
    let second = assemble_prompt(temp.path()).unwrap();
    assert_eq!(first, second);

    assert!(first.contains("**demo**"));
    assert!(first.contains("### API Endpoint"));
    assert!(first.contains("- `routes/r4.py`"));
    assert!(first.contains("- _(+2 more)_"));
    assert!(first.contains("**Entry Points**: 7 detected"));
}

#[test]
fn test_prompt_without_store_uses_directory_name() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("inventory");
    fs::create_dir(&project).unwrap();

    let prompt = assemble_prompt(&project).unwrap();
    assert!(prompt.contains("**inventory**"));
    assert!(prompt.contains("No entry points detected"));
}
