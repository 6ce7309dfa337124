//! Filesystem convenience wrappers.

use std::path::Path;

use crate::error::{CairnError, Result};

/// Recursively create `path`, tolerating directories that already exist.
///
/// Fails with an `Execution` error when a component of `path` exists as a
/// regular file.
pub fn mkdir_p(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|err| {
        CairnError::execution(format!(
            "mkdir_p: unable to create '{}': {err}",
            path.display()
        ))
    })
}

/// Remove a file or directory tree, tolerating paths that do not exist.
pub fn rm_rf(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Ok(()), // nothing to remove
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|err| {
        CairnError::execution(format!("rm_rf: unable to remove '{}': {err}", path.display()))
    })
}
