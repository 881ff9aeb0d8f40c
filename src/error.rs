// src/error.rs
// =============================================================================
// Typed errors for the hyperlink model.
//
// Classification never fails. The only fallible step is turning a local link
// into an absolute path, which needs the directory of the markdown file and,
// for relative paths, the current working directory.
//
// The application layers (scan, checker, main) use anyhow::Result and wrap
// these errors with context.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    /// The markdown file path has no containing directory (e.g. "/" or "")
    #[error("cannot determine the directory containing '{0}'")]
    NoParentDirectory(String),

    /// A relative path had to be anchored but the working directory is unknown
    #[error("cannot read the current working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}
