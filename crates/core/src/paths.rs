//! Filesystem location helpers for the data, backup and log directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Resolve a configured directory, create it if missing and verify that it
/// is writable.
///
/// Surrounding quotes are stripped. A value that looks like a file path
/// (has an extension) resolves to its parent directory.
pub fn ensure_directory(raw: &str) -> Result<PathBuf, CoreError> {
    let trimmed = raw.trim().trim_matches('"').trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Directory path is empty".to_string()));
    }

    let mut dir = PathBuf::from(trimmed);
    if dir.extension().is_some() {
        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            dir = parent.to_path_buf();
        }
    }

    fs::create_dir_all(&dir).map_err(|e| {
        CoreError::Internal(format!("Failed to create directory {}: {e}", dir.display()))
    })?;
    probe_writable(&dir)?;

    Ok(dir)
}

fn probe_writable(dir: &Path) -> Result<(), CoreError> {
    let probe = dir.join(format!(".write-test-{}", std::process::id()));
    fs::write(&probe, b"ok").map_err(|e| {
        CoreError::Internal(format!("Directory {} is not writable: {e}", dir.display()))
    })?;
    let _ = fs::remove_file(&probe);
    Ok(())
}

/// Resolve `file_name` inside `dir`, refusing anything that escapes it.
///
/// Only bare file names are accepted; separators and `..` are rejected.
pub fn contained_file(dir: &Path, file_name: &str) -> Result<PathBuf, CoreError> {
    let name = file_name.trim();
    let is_bare = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name);
    if !is_bare {
        return Err(CoreError::Validation("Invalid file name".to_string()));
    }
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a").join("b");
        let resolved = ensure_directory(&format!("\"{}\"", target.display())).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn file_like_path_uses_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("data").join("myficdb.db");
        let resolved = ensure_directory(file.to_str().unwrap()).unwrap();
        assert_eq!(resolved, tmp.path().join("data"));
    }

    #[test]
    fn empty_path_rejected() {
        assert_matches!(ensure_directory("  \"\" "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn contained_file_rejects_traversal() {
        let dir = Path::new("/var/logs");
        assert_eq!(
            contained_file(dir, "app.log").unwrap(),
            PathBuf::from("/var/logs/app.log")
        );
        assert!(contained_file(dir, "../etc/passwd").is_err());
        assert!(contained_file(dir, "sub/app.log").is_err());
        assert!(contained_file(dir, "..").is_err());
        assert!(contained_file(dir, "").is_err());
    }
}
