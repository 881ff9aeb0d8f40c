// src/scan/mod.rs
// =============================================================================
// This module reads a documentation folder into parsed documents.
//
// Submodules:
// - walker: finds the markdown files (walkdir)
//
// Each markdown file becomes a Document holding its links and headings.
// The checkers work on these documents and never parse markdown themselves,
// except for anchor targets outside the scanned set.
// =============================================================================

mod walker;

pub use walker::{find_markdown_files, is_markdown};

use crate::markdown;
use crate::models::{Heading, Hyperlink};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A parsed markdown file
#[derive(Debug)]
pub struct Document {
    pub path: PathBuf,
    pub links: Vec<Hyperlink>,
    pub headings: Vec<Heading>,
    /// Ids of raw HTML elements (<a name="..">, id="..")
    pub html_anchors: Vec<String>,
}

impl Document {
    // Reads and parses one markdown file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let extracted = markdown::extract(&path.to_string_lossy(), &content);

        debug!(
            file = %path.display(),
            links = extracted.links.len(),
            headings = extracted.headings.len(),
            "parsed markdown file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            links: extracted.links,
            headings: extracted.headings,
            html_anchors: extracted.html_anchors,
        })
    }
}

// Finds and parses every markdown file below `root`
pub fn scan_documents(root: &Path, exclude: &[String]) -> Result<Vec<Document>> {
    find_markdown_files(root, exclude)?
        .iter()
        .map(|path| Document::load(path))
        .collect()
}
