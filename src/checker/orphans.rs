// src/checker/orphans.rs
// =============================================================================
// Finds attachments that no document links to.
//
// Only files below a resource folder (".attachments" by default) are
// considered; images next to markdown files are often used by other tools.
// =============================================================================

use crate::report::{Finding, FindingKind};
use crate::scan::is_markdown;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

// Reports every resource file that isn't in `referenced`
//
// `docs_root` and the paths in `referenced` must be absolute and normalized.
pub fn find_orphaned_resources(
    docs_root: &Path,
    resource_folder_names: &[String],
    exclude: &[String],
    referenced: &HashSet<PathBuf>,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    let walker = WalkDir::new(docs_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || !exclude.iter().any(|excluded| *excluded == name)
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", docs_root.display()))?;
        let path = entry.path();

        if !entry.file_type().is_file() || is_markdown(path) || !in_resource_folder(docs_root, path, resource_folder_names) {
            continue;
        }

        if referenced.contains(path) {
            debug!(resource = %path.display(), "resource is referenced");
        } else {
            findings.push(Finding::for_file(
                path.to_string_lossy(),
                FindingKind::OrphanedResource,
                "Resource is not referenced by any document",
            ));
        }
    }

    Ok(findings)
}

// True if a folder between the root and the file has a resource folder name
fn in_resource_folder(docs_root: &Path, path: &Path, resource_folder_names: &[String]) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    let Ok(relative) = parent.strip_prefix(docs_root) else {
        return false;
    };

    relative.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        resource_folder_names.iter().any(|folder| *folder == name)
    })
}
