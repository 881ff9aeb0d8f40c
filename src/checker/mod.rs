// src/checker/mod.rs
// =============================================================================
// This module contains all link validation logic.
//
// Submodules:
// - local: Validates links to files, folders and headings in the docs tree
// - http: Makes HTTP requests to check if web links are alive
// - orphans: Finds attachments nobody links to
//
// The checkers only produce findings. Whether a finding fails the run is
// decided by the report module.
// =============================================================================

mod http;
mod local;
mod orphans;

pub use http::check_web_links;
pub use local::{LocalLinkChecker, LocalReport};
pub use orphans::find_orphaned_resources;

use crate::models::normalize_path;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Makes a path absolute (against the working directory) and normalizes it
///
/// Uses the same rules as `Hyperlink::url_full_path`, so paths computed here
/// can be compared with link targets.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read the current working directory")?
            .join(path)
    };
    Ok(normalize_path(&absolute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_normalizes() {
        let path = absolute_path(Path::new("/docs/./guide/../index.md")).unwrap();
        assert_eq!(path, PathBuf::from("/docs/index.md"));
    }

    #[test]
    fn test_relative_path_becomes_absolute() {
        let path = absolute_path(Path::new("docs")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("docs"));
    }
}
