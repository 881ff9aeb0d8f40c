// src/models/hyperlink.rs
// =============================================================================
// This module models a single hyperlink found in a markdown document.
//
// A Hyperlink answers two questions:
// 1. What kind of link is this? (web, ftp, mail, xref, local, resource, empty)
// 2. If it is local, which file on disk and which anchor does it point to?
//
// The link type is decided once, in Hyperlink::new, from the raw url text.
// Everything else (topic, path without topic, full path) is computed on
// demand from the immutable fields, so a Hyperlink can be shared freely
// between threads without any locking.
//
// Rust concepts:
// - Enums: LinkType is a closed set of variants
// - Borrowing: accessors hand out &str slices of the stored url
// - Result: resolving the full path can fail and says so in its type
// =============================================================================

use crate::error::LinkError;
use crate::models::Location;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// The kind of target a hyperlink points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Empty or whitespace-only url
    Empty,
    /// http:// or https://
    Webpage,
    /// ftp:// or ftps://
    Ftp,
    /// mailto:
    Mail,
    /// xref: (resolved by an external documentation toolchain)
    CrossReference,
    /// Another markdown file or a folder
    Local,
    /// Any other local file, like an image or a pdf
    Resource,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkType::Empty => "empty",
            LinkType::Webpage => "webpage",
            LinkType::Ftp => "ftp",
            LinkType::Mail => "mail",
            LinkType::CrossReference => "xref",
            LinkType::Local => "local",
            LinkType::Resource => "resource",
        };
        f.write_str(name)
    }
}

/// A hyperlink discovered in a markdown file
///
/// Construct it with [`Hyperlink::new`]; the fields are private so the
/// classification can never drift from the url it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hyperlink {
    #[serde(flatten)]
    location: Location,
    url: String,
    link_type: LinkType,
}

impl Hyperlink {
    /// Creates a hyperlink and classifies its url
    ///
    /// `file_path` is the markdown file the link was found in, `line` and
    /// `column` are 1-based. Any url is accepted, including malformed ones.
    pub fn new(file_path: impl Into<String>, line: usize, column: usize, url: impl Into<String>) -> Self {
        let url = url.into();
        let link_type = classify(&url);

        Self {
            location: Location::new(file_path, line, column),
            url,
            link_type,
        }
    }

    pub fn file_path(&self) -> &str {
        self.location.file_path()
    }

    pub fn line(&self) -> usize {
        self.location.line()
    }

    pub fn column(&self) -> usize {
        self.location.column()
    }

    /// The link target exactly as written in the document
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// True for links to files in the documentation tree (markdown or resource)
    pub fn is_local(&self) -> bool {
        matches!(self.link_type, LinkType::Local | LinkType::Resource)
    }

    /// True for links that need a network request (http(s) or ftp(s))
    pub fn is_web(&self) -> bool {
        matches!(self.link_type, LinkType::Webpage | LinkType::Ftp)
    }

    /// The anchor of a local link: everything after the first '#'
    ///
    /// Without a '#', a '?' is used as the delimiter instead, so query strings
    /// are treated like anchors. Returns "" for non-local links or when
    /// there is no delimiter.
    pub fn url_topic(&self) -> &str {
        if !self.is_local() {
            return "";
        }

        match topic_delimiter(&self.url) {
            Some(pos) => &self.url[pos + 1..],
            None => "",
        }
    }

    /// The url of a local link with its topic removed
    ///
    /// A link that is only an anchor ("#setup") targets the file it was
    /// found in, so the file path is returned. Non-local links are returned
    /// unchanged.
    pub fn url_without_topic(&self) -> &str {
        if !self.is_local() {
            return &self.url;
        }

        match topic_delimiter(&self.url) {
            None => &self.url,
            Some(0) => self.location.file_path(),
            Some(pos) => &self.url[..pos],
        }
    }

    /// The absolute, normalized target path of a local link (without topic)
    ///
    /// Relative file paths are anchored at the current working directory.
    /// Non-local links are returned unchanged.
    pub fn url_full_path(&self) -> Result<String, LinkError> {
        self.resolve_full_path(|| Ok(std::env::current_dir()?))
    }

    /// Like [`Hyperlink::url_full_path`], but anchors relative paths at `base`
    ///
    /// Never touches the filesystem or the process environment.
    pub fn url_full_path_from(&self, base: &Path) -> Result<String, LinkError> {
        self.resolve_full_path(|| Ok(base.to_path_buf()))
    }

    // The base directory is only requested when the joined path is relative
    fn resolve_full_path<F>(&self, base: F) -> Result<String, LinkError>
    where
        F: FnOnce() -> Result<PathBuf, LinkError>,
    {
        if !self.is_local() {
            return Ok(self.url.clone());
        }

        let target = match topic_delimiter(&self.url) {
            Some(0) => PathBuf::from(self.location.file_path()),
            _ => {
                let file_path = self.location.file_path();
                let directory = Path::new(file_path)
                    .parent()
                    .ok_or_else(|| LinkError::NoParentDirectory(file_path.to_string()))?;
                directory.join(self.url_without_topic())
            }
        };

        let absolute = if target.is_absolute() {
            target
        } else {
            base()?.join(target)
        };

        Ok(normalize_path(&absolute).to_string_lossy().into_owned())
    }
}

// Ordered, first match wins. Scheme prefixes are case-sensitive, only the
// extension comparison ignores case.
fn classify(url: &str) -> LinkType {
    if url.trim().is_empty() {
        LinkType::Empty
    } else if url.starts_with("https://") || url.starts_with("http://") {
        LinkType::Webpage
    } else if url.starts_with("ftps://") || url.starts_with("ftp://") {
        LinkType::Ftp
    } else if url.starts_with("mailto:") {
        LinkType::Mail
    } else if url.starts_with("xref:") {
        LinkType::CrossReference
    } else {
        let path = match topic_delimiter(url) {
            Some(pos) => &url[..pos],
            None => url,
        };
        let extension = extension(path);

        if extension.is_empty() || extension.eq_ignore_ascii_case(".md") {
            // a markdown file or a folder
            LinkType::Local
        } else {
            LinkType::Resource
        }
    }
}

// Position of the first '#', or of the first '?' when there is no '#'
fn topic_delimiter(url: &str) -> Option<usize> {
    url.find('#').or_else(|| url.find('?'))
}

// The extension including its dot, taken from the last path segment.
// "file." and "folder/" have no extension.
fn extension(path: &str) -> &str {
    let name_start = path.rfind(|c: char| c == '/' || c == '\\').map_or(0, |pos| pos + 1);
    let name = &path[name_start..];

    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[dot..],
        _ => "",
    }
}

/// Resolves "." and ".." segments without touching the filesystem
///
/// ".." at the root stays at the root, like the operating system does.
/// A trailing separator is dropped: "folder/" resolves to ".../folder".
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}
