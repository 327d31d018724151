//! Corpus enumeration
//!
//! Walks the root folder recursively and collects every regular file with
//! the configured extension, skipping excluded directories. Runs once on the
//! main thread before any worker starts.

use crate::engine::FileJob;
use crate::error::{ConfigError, EnumerateError, NgramError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Resolve exclusions to canonical paths, dropping those that do not resolve
pub fn canonical_exclusions(excluded: &[PathBuf]) -> Vec<PathBuf> {
    excluded
        .iter()
        .filter_map(|path| match fs::canonicalize(path) {
            Ok(canonical) => Some(canonical),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error getting canonical path for excluded folder");
                None
            }
        })
        .collect()
}

fn is_excluded(path: &Path, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() {
        return false;
    }
    match fs::canonicalize(path) {
        Ok(canonical) => excluded.iter().any(|e| *e == canonical),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error getting canonical path");
            false
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// List the files under `root` with `extension` (without the leading dot)
///
/// The result is sorted. Directories listed in `excluded` are pruned with
/// their whole subtree. Unreadable entries are logged and skipped.
pub fn list_files(root: &Path, excluded: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConfigError::InvalidRoot {
            path: root.to_path_buf(),
        }
        .into());
    }

    fs::read_dir(root).map_err(|e| EnumerateError::RootUnreadable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let excluded = canonical_exclusions(excluded);

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            if entry.file_type().is_dir() && is_excluded(entry.path(), &excluded) {
                debug!(path = %entry.path().display(), "Skipping excluded folder");
                return false;
            }
            true
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Error accessing file or folder");
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "Enumeration finished");
    Ok(files)
}

/// Enumerate the corpus into file jobs, failing if nothing matched
pub fn enumerate_jobs(root: &Path, excluded: &[PathBuf], extension: &str) -> Result<Vec<FileJob>> {
    let files = list_files(root, excluded, extension)?;

    if files.is_empty() {
        return Err(NgramError::NoInputFiles {
            root: root.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    Ok(files.into_iter().map(FileJob::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "content").unwrap();
    }

    #[test]
    fn test_lists_matching_extension_recursively() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.txt"));
        touch(&dir.path().join("nested/deeper/b.txt"));
        touch(&dir.path().join("nested/c.md"));
        touch(&dir.path().join("notxt"));

        let files = list_files(dir.path(), &[], "txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_excluded_folder_pruned() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("keep/a.txt"));
        touch(&dir.path().join("skip/b.txt"));
        touch(&dir.path().join("skip/inner/c.txt"));

        let files = list_files(dir.path(), &[dir.path().join("skip")], "txt").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep/a.txt"));
    }

    #[test]
    fn test_missing_exclusion_ignored() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.txt"));

        let files = list_files(dir.path(), &[dir.path().join("does-not-exist")], "txt").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_invalid_root() {
        let dir = tempdir().unwrap();
        let result = list_files(&dir.path().join("missing"), &[], "txt");
        assert!(matches!(
            result,
            Err(NgramError::Config(ConfigError::InvalidRoot { .. }))
        ));
    }

    #[test]
    fn test_no_input_files() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.md"));

        let result = enumerate_jobs(dir.path(), &[], "txt");
        assert!(matches!(result, Err(NgramError::NoInputFiles { .. })));
    }
}
