// src/markdown/extract.rs
// =============================================================================
// This module extracts links and headings from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Can report the byte range of every event (the "offset iterator")
//
// The byte ranges are turned into 1-based line and column numbers so the
// report can point at the exact spot in the file.
//
// Besides headings, raw HTML like <a name="faq"></a> or <div id="faq"> can
// be a link target, so those ids are collected too.
//
// Rust concepts:
// - Iterators: For processing sequences of events
// - Pattern matching: To identify link, image and heading events
// - Lifetimes: LineIndex borrows the text it indexes
// =============================================================================

use crate::models::{Heading, Hyperlink, Location, Slugger};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, LinkType as MarkdownLinkType, Options, Parser, Tag};
use regex::Regex;

// id="..." or name="..." inside an HTML tag, either quote style
static HTML_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)(?:id|name)\s*=\s*["']([^"']+)["']"#).expect("valid anchor pattern")
});

/// Everything we need from one markdown file
#[derive(Debug, Default)]
pub struct Extracted {
    pub links: Vec<Hyperlink>,
    pub headings: Vec<Heading>,
    /// Ids declared by raw HTML elements
    pub html_anchors: Vec<String>,
}

// A heading we have seen the start of but not the end
struct PendingHeading {
    offset: usize,
    id: Option<String>,
    title: String,
}

// Extracts all links (including images) and headings from markdown text
//
// Parameters:
//   file_path: the markdown file the text came from (stored in every link)
//   markdown: the markdown text to parse
//
// Example input:
//   "# Intro\n\nSee [setup](setup.md#install)"
//
// Example output:
//   links: [Hyperlink { line: 3, column: 5, url: "setup.md#install", .. }]
//   headings: [Heading { id: "intro", .. }]
pub fn extract(file_path: &str, markdown: &str) -> Extracted {
    let index = LineIndex::new(markdown);
    let mut extracted = Extracted::default();

    // Track the heading we're currently inside
    // A heading produces Start(Heading), then Text/Code events, then End(Heading)
    let mut current_heading: Option<PendingHeading> = None;
    let mut slugger = Slugger::default();

    let parser = Parser::new_ext(markdown, parser_options()).into_offset_iter();

    for (event, range) in parser {
        match event {
            // Inline, reference and autolinks, and images all carry a destination
            Event::Start(Tag::Link(kind, dest_url, _title))
            | Event::Start(Tag::Image(kind, dest_url, _title)) => {
                let (line, column) = index.position(range.start);

                // <someone@example.com> has no scheme in its destination
                let url = if matches!(kind, MarkdownLinkType::Email) {
                    format!("mailto:{}", dest_url)
                } else {
                    dest_url.to_string()
                };

                extracted.links.push(Hyperlink::new(file_path, line, column, url));
            }

            Event::Start(Tag::Heading(_level, id, _classes)) => {
                current_heading = Some(PendingHeading {
                    offset: range.start,
                    id: id.map(str::to_string),
                    title: String::new(),
                });
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current_heading.as_mut() {
                    heading.title.push_str(&text);
                }
            }

            Event::End(Tag::Heading(..)) => {
                if let Some(heading) = current_heading.take() {
                    let (line, column) = index.position(heading.offset);
                    extracted.headings.push(Heading::new(
                        Location::new(file_path, line, column),
                        heading.title.trim(),
                        heading.id.as_deref(),
                        &mut slugger,
                    ));
                }
            }

            Event::Html(html) => {
                for anchor in html_anchors(&html) {
                    slugger.reserve(&anchor);
                    extracted.html_anchors.push(anchor);
                }
            }

            // We don't care about other events (paragraphs, emphasis, etc.)
            _ => {}
        }
    }

    extracted
}

fn html_anchors(html: &str) -> Vec<String> {
    if !html.contains('<') {
        return Vec::new();
    }

    HTML_ANCHOR
        .captures_iter(html)
        .map(|captures| captures[1].to_string())
        .collect()
}

// The markdown flavour used by most documentation sites
fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

// Maps byte offsets to 1-based (line, column) pairs
//
// Columns count characters, not bytes, so non-ASCII text before a link
// doesn't shift the reported column.
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(pos, _)| pos + 1));
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = self.text[self.line_starts[line]..offset].chars().count() + 1;
        (line + 1, column)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does into_offset_iter() give us?
//    - The normal parser yields events only
//    - into_offset_iter() yields (event, byte_range) pairs
//    - The range of Start(Link) covers the whole link, starting at '['
//
// 2. Why binary_search for line numbers?
//    - line_starts is sorted, so finding the line of an offset is O(log n)
//    - Ok(i) means the offset is exactly the start of line i
//    - Err(i) means it falls inside line i - 1
//
// 3. Why `A | B` in one match arm?
//    - Links and images bind the same kinds of values
//    - An or-pattern handles both with one block
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkType;

    #[test]
    fn test_extract_link_with_position() {
        let markdown = "# Intro\n\nSee [setup](setup.md#install) now";
        let extracted = extract("/docs/index.md", markdown);

        assert_eq!(extracted.links.len(), 1);
        let link = &extracted.links[0];
        assert_eq!(link.url(), "setup.md#install");
        assert_eq!(link.file_path(), "/docs/index.md");
        assert_eq!(link.line(), 3);
        assert_eq!(link.column(), 5);
        assert_eq!(link.link_type(), LinkType::Local);
    }

    #[test]
    fn test_extract_all_link_kinds() {
        let markdown = r#"
- [Rust](https://www.rust-lang.org)
- ![logo](images/logo.png)
- [mail](mailto:test@example.com)
- <https://docs.rs>
- [api](xref:System.String)
        "#;
        let extracted = extract("/docs/index.md", markdown);
        let types: Vec<LinkType> = extracted.links.iter().map(|l| l.link_type()).collect();

        assert_eq!(
            types,
            vec![
                LinkType::Webpage,
                LinkType::Resource,
                LinkType::Mail,
                LinkType::Webpage,
                LinkType::CrossReference,
            ]
        );
    }

    #[test]
    fn test_email_autolink_gets_mailto() {
        let extracted = extract("/docs/index.md", "Write to <someone@example.com>.");
        assert_eq!(extracted.links[0].url(), "mailto:someone@example.com");
        assert_eq!(extracted.links[0].link_type(), LinkType::Mail);
    }

    #[test]
    fn test_reference_links_are_resolved() {
        let markdown = "Read [the guide][guide].\n\n[guide]: ./guide.md";
        let extracted = extract("/docs/index.md", markdown);
        assert_eq!(extracted.links.len(), 1);
        assert_eq!(extracted.links[0].url(), "./guide.md");
    }

    #[test]
    fn test_skip_links_in_code() {
        let markdown = "`[not](a.md)`\n\n```\n[also not](b.md)\n```\n";
        let extracted = extract("/docs/index.md", markdown);
        assert!(extracted.links.is_empty());
    }

    #[test]
    fn test_extract_headings() {
        let markdown = "# Getting Started\n\ntext\n\n## The `run` command\n\n## Setup {#install}\n";
        let extracted = extract("/docs/index.md", markdown);
        let ids: Vec<&str> = extracted.headings.iter().map(|h| h.id()).collect();

        assert_eq!(ids, vec!["getting-started", "the-run-command", "install"]);
        assert_eq!(extracted.headings[1].title(), "The run command");
        assert_eq!(extracted.headings[1].location().line(), 5);
    }

    #[test]
    fn test_repeated_headings_get_numbered_ids() {
        let markdown = "# Setup\n\n## Setup\n\n### Setup\n";
        let extracted = extract("/docs/index.md", markdown);
        let ids: Vec<&str> = extracted.headings.iter().map(|h| h.id()).collect();

        assert_eq!(ids, vec!["setup", "setup-1", "setup-2"]);
    }

    #[test]
    fn test_extract_html_anchors() {
        let markdown = "<a name=\"faq\"></a>\n\nText with <span id='inline-note'>a note</span>.\n\n\
                        <div data-id=\"nope\" class=\"box\">\n\nbox\n\n</div>\n";
        let extracted = extract("/docs/index.md", markdown);

        assert_eq!(extracted.html_anchors, vec!["faq", "inline-note"]);
    }

    #[test]
    fn test_column_counts_characters() {
        let extracted = extract("/docs/index.md", "Zoë [x](y.md)");
        assert_eq!(extracted.links[0].column(), 5);
    }
}
