// src/config.rs
// =============================================================================
// This file defines the settings of a check run.
//
// Settings come from two places:
// 1. An optional JSON file (--config docs-links.json)
// 2. Command-line flags, which win over the file
//
// Example file:
//   {
//     "sourceFolder": "docs",
//     "exclude": ["drafts"],
//     "validateExternalLinks": true,
//     "relativeLinkStrategy": "sameDocsHierarchyOnly",
//     "whitelistUrls": ["https://localhost"]
//   }
//
// Every field has a default, so an empty file ("{}") is valid.
// =============================================================================

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which local link targets are allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelativeLinkStrategy {
    /// Any existing target is fine
    #[default]
    All,
    /// Targets must be inside the documentation folder
    SameDocsHierarchyOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Root of the documentation tree
    pub source_folder: PathBuf,
    /// File or folder names to skip while scanning
    pub exclude: Vec<String>,
    /// Folder names that hold images and other attachments
    pub resource_folder_names: Vec<String>,
    /// Request http(s) links over the network
    pub validate_external_links: bool,
    pub relative_link_strategy: RelativeLinkStrategy,
    /// Warn about attachments no document links to
    pub check_for_orphaned_resources: bool,
    /// How many web requests run at once
    pub concurrency_level: usize,
    pub max_http_redirects: usize,
    pub timeout_secs: u64,
    /// Web links starting with one of these are never requested
    pub whitelist_urls: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_folder: PathBuf::from("."),
            exclude: Vec::new(),
            resource_folder_names: vec![".attachments".to_string()],
            validate_external_links: false,
            relative_link_strategy: RelativeLinkStrategy::All,
            check_for_orphaned_resources: false,
            concurrency_level: 50,
            max_http_redirects: 5,
            timeout_secs: 10,
            whitelist_urls: Vec::new(),
        }
    }
}

impl AppConfig {
    // Loads settings from a JSON file
    //
    // A relative sourceFolder is taken relative to the config file, so the
    // same file works no matter where the tool is started from.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if config.source_folder.is_relative() {
            if let Some(dir) = path.parent() {
                config.source_folder = dir.join(&config.source_folder);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency_level == 0 {
            bail!("concurrencyLevel must be at least 1");
        }
        Ok(())
    }
}
