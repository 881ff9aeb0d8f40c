// src/scan/walker.rs
// =============================================================================
// This module finds the markdown files of a documentation folder.
//
// How it works:
// 1. Walk the folder recursively with the `walkdir` crate
// 2. Skip any directory or file whose name is in the exclude list
// 3. Keep files with an .md extension (any case)
// 4. Return them sorted so reports are stable between runs
// =============================================================================

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

// Finds all markdown files below `root`
//
// Parameters:
//   root: the documentation folder
//   exclude: file or folder names to skip (e.g. "node_modules", "drafts")
//
// Returns: sorted paths of all markdown files, or an error if `root`
// is not a readable folder
pub fn find_markdown_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Documentation folder not found: {}", root.display());
    }

    let mut files = Vec::new();

    // filter_entry prunes whole subtrees, so excluded folders are never read
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry, exclude));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;

        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        } else if entry.file_type().is_dir() {
            debug!(folder = %entry.path().display(), "scanning folder");
        }
    }

    files.sort();
    Ok(files)
}

/// True if the path has an .md extension, ignoring case
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("md"))
}

fn is_excluded(entry: &DirEntry, exclude: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    exclude.iter().any(|excluded| *excluded == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_markdown_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guide/deep")).unwrap();
        fs::write(dir.path().join("index.md"), "# Home").unwrap();
        fs::write(dir.path().join("guide/setup.MD"), "# Setup").unwrap();
        fs::write(dir.path().join("guide/deep/notes.md"), "# Notes").unwrap();
        fs::write(dir.path().join("guide/logo.png"), [0u8; 4]).unwrap();

        let files = find_markdown_files(dir.path(), &[]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["guide/deep/notes.md", "guide/setup.MD", "index.md"]);
    }

    #[test]
    fn test_excluded_folders_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("index.md"), "# Home").unwrap();
        fs::write(dir.path().join("drafts/wip.md"), "# WIP").unwrap();

        let files = find_markdown_files(dir.path(), &["drafts".to_string()]).unwrap();
        assert_eq!(files, vec![dir.path().join("index.md")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_markdown_files(&dir.path().join("nope"), &[]).is_err());
    }
}
