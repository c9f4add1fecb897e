//! Filesystem primitives for the article and image directories.
//!
//! Every caller-supplied filename goes through [`resolve_in`] before it is
//! joined onto a base directory, so nothing outside the two storage roots can
//! be read or written.

use crate::error::{Error, Result};

use std::path::{Component, Path, PathBuf};

/// Create `dir` (and any missing parents) unless it already exists.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    if tokio::fs::metadata(dir).await.is_ok_and(|meta| meta.is_dir()) {
        return Ok(());
    }

    tokio::fs::create_dir_all(dir).await?;
    tracing::debug!(path = %dir.display(), "created storage directory");
    Ok(())
}

/// Resolve `filename` to a path directly inside `base`.
///
/// The name must be a single normal path segment: no separators, no `.` or
/// `..`, no NUL bytes.
pub fn resolve_in(base: &Path, filename: &str) -> Result<PathBuf> {
    if filename.trim().is_empty() {
        return Err(Error::InvalidInput("filename must not be empty".into()));
    }
    if filename.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidInput(format!(
            "filename '{filename}' must not contain path separators"
        )));
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => {
            return Err(Error::InvalidInput(format!(
                "filename '{filename}' is not a valid file name"
            )));
        }
    }

    let path = base.join(filename);
    if path.parent() != Some(base) {
        return Err(Error::InvalidInput(format!(
            "filename '{filename}' escapes its storage directory"
        )));
    }

    Ok(path)
}

/// Replace `target` with `bytes` through a sibling temporary file and a rename.
///
/// Concurrent writers to the same target still race (last rename wins), but
/// no reader ever sees a mix of both payloads.
pub async fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| Error::InvalidInput(format!("{} has no parent", target.display())))?;
    let name = target
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("{} has no file name", target.display())))?;

    let temp = dir.join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()));
    tokio::fs::write(&temp, bytes).await?;

    if let Err(error) = tokio::fs::rename(&temp, target).await {
        tokio::fs::remove_file(&temp).await.ok();
        return Err(error.into());
    }

    Ok(())
}
