// src/markdown/mod.rs
// =============================================================================
// This module turns markdown text into hyperlinks and headings.
//
// Submodules:
// - extract: pulldown-cmark based extraction with line/column positions
// =============================================================================

mod extract;

pub use extract::extract;
