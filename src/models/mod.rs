// src/models/mod.rs
// =============================================================================
// Value types shared by the scanner, the checkers and the report.
//
// Submodules:
// - location: file path + line + column
// - hyperlink: a link, its classification and its resolved target
// - heading: a heading and the anchor id other links can point at
// =============================================================================

mod heading;
mod hyperlink;
mod location;

pub use heading::{Heading, Slugger};
pub use hyperlink::{normalize_path, Hyperlink, LinkType};
pub use location::Location;
