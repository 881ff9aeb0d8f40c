// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - check: validate every link in a documentation folder
// - classify: show how a single link is classified and resolved
// =============================================================================

use crate::config::{AppConfig, RelativeLinkStrategy};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doc-link-checker",
    version,
    about = "Validate local, anchor and web links in markdown documentation",
    long_about = "doc-link-checker scans a documentation folder for markdown files and checks every link: \
                  local files and folders must exist, #anchors must match a heading, and web links can \
                  optionally be requested. Exit code 0 means no errors, 1 means broken links, 2 means the \
                  check itself failed."
)]
pub struct Cli {
    /// Print debug logs to stderr (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check all links in a documentation folder
    ///
    /// Example: doc-link-checker check docs --web
    Check(CheckArgs),

    /// Show how a single link is classified and where it points
    ///
    /// Example: doc-link-checker classify --file docs/intro.md "../images/pic.png"
    Classify {
        /// The raw link target, exactly as written in markdown
        url: String,

        /// The markdown file the link is in
        #[arg(long, default_value = "README.md")]
        file: String,
    },
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Documentation folder (overrides sourceFolder from the config file)
    pub folder: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also request http(s) links over the network
    #[arg(long)]
    pub web: bool,

    /// Fail links whose target is outside the documentation folder
    #[arg(long)]
    pub same_hierarchy: bool,

    /// Warn about attachments that no document links to
    #[arg(long)]
    pub orphans: bool,

    /// Maximum number of concurrent web requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// File or folder name to skip (can be repeated)
    #[arg(long)]
    pub exclude: Vec<String>,
}

impl CheckArgs {
    // Loads the config file (if any) and applies the flags on top of it
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(folder) = &self.folder {
            config.source_folder = folder.clone();
        }
        if self.web {
            config.validate_external_links = true;
        }
        if self.same_hierarchy {
            config.relative_link_strategy = RelativeLinkStrategy::SameDocsHierarchyOnly;
        }
        if self.orphans {
            config.check_for_orphaned_resources = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency_level = concurrency;
        }
        config.exclude.extend(self.exclude.iter().cloned());

        config.validate()?;
        Ok(config)
    }
}
