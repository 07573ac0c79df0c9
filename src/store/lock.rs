//! Write serialization and atomic file replacement.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::error::StoreResult;

/// One writer lock per canonical project root.
static ROOT_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = Lazy::new(Default::default);

/// Get the writer lock for a project root.
///
/// Handles created for the same directory through different paths share a lock.
pub(crate) fn root_lock(root: &Path) -> Arc<Mutex<()>> {
    let key = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    Arc::clone(ROOT_LOCKS.lock().entry(key).or_default())
}

/// Write a file atomically (write to temp, then rename).
pub(crate) fn write_file_atomic(path: &Path, content: &str) -> StoreResult<()> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}
