// src/models/location.rs
// =============================================================================
// Where something was found in a markdown file.
//
// Hyperlinks and headings both embed a Location by value instead of sharing
// a base type. Lines and columns are 1-based, columns count characters.
// =============================================================================

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    file_path: String,
    line: usize,
    column: usize,
}

impl Location {
    pub fn new(file_path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

// Formats as "path:line:column", the form editors understand
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.column)
    }
}
