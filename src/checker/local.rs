// src/checker/local.rs
// =============================================================================
// This module validates links to files inside the documentation tree.
//
// For every local link (markdown, folder or resource) we:
// 1. Resolve the absolute target path from the link and its file
// 2. Optionally require the target to be inside the documentation folder
// 3. Check the target exists (resources must be files, folders are fine
//    for markdown links)
// 4. For "page.md#heading" links, check the heading exists in page.md
//
// Link targets are percent-decoded before looking at the disk, so
// "my%20file.md" finds "my file.md".
//
// Empty links are reported here too. Web, mail and xref links are left to
// other checkers (or ignored).
// =============================================================================

use crate::config::RelativeLinkStrategy;
use crate::models::{Hyperlink, LinkType};
use crate::report::{Finding, FindingKind};
use crate::scan::{is_markdown, Document};
use percent_encoding::percent_decode_str;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the local checker found
#[derive(Debug, Default)]
pub struct LocalReport {
    pub findings: Vec<Finding>,
    /// Absolute paths of every resource some link points at
    pub referenced_resources: HashSet<PathBuf>,
}

pub struct LocalLinkChecker {
    docs_root: PathBuf,
    strategy: RelativeLinkStrategy,
    // Lowercased heading ids per markdown file, filled lazily for files
    // outside the scanned set
    anchors: HashMap<PathBuf, HashSet<String>>,
}

impl LocalLinkChecker {
    // `docs_root` must already be absolute and normalized
    pub fn new(documents: &[Document], docs_root: PathBuf, strategy: RelativeLinkStrategy) -> Self {
        let mut anchors = HashMap::new();

        for document in documents {
            match super::absolute_path(&document.path) {
                Ok(path) => {
                    anchors.insert(path, anchor_ids(document));
                }
                Err(e) => warn!(file = %document.path.display(), "cannot index headings: {:#}", e),
            }
        }

        Self {
            docs_root,
            strategy,
            anchors,
        }
    }

    // Checks every link of every document
    pub fn check(&mut self, documents: &[Document]) -> LocalReport {
        let mut report = LocalReport::default();

        for link in documents.iter().flat_map(|document| &document.links) {
            if let Some(finding) = self.check_link(link, &mut report.referenced_resources) {
                report.findings.push(finding);
            }
        }

        report
    }

    fn check_link(&mut self, link: &Hyperlink, referenced: &mut HashSet<PathBuf>) -> Option<Finding> {
        match link.link_type() {
            LinkType::Empty => Some(Finding::for_link(link, FindingKind::EmptyLink, "Link has no target")),
            LinkType::Local | LinkType::Resource => self.check_target(link, referenced),
            // Web links are checked over the network, mail and xref are not checked
            _ => None,
        }
    }

    fn check_target(&mut self, link: &Hyperlink, referenced: &mut HashSet<PathBuf>) -> Option<Finding> {
        let target = match link.url_full_path() {
            Ok(path) => decode_target(&path),
            Err(e) => {
                return Some(Finding::for_link(link, FindingKind::UnresolvablePath, e.to_string()));
            }
        };

        debug!(url = link.url(), kind = %link.link_type(), target = %target.display(), "checking local link");

        if link.link_type() == LinkType::Resource {
            referenced.insert(target.clone());
        }

        if self.strategy == RelativeLinkStrategy::SameDocsHierarchyOnly && !target.starts_with(&self.docs_root) {
            return Some(Finding::for_link(
                link,
                FindingKind::OutsideDocsHierarchy,
                format!("{} is outside {}", target.display(), self.docs_root.display()),
            ));
        }

        let exists = match link.link_type() {
            LinkType::Resource => target.is_file(),
            _ => target.exists(),
        };
        if !exists {
            return Some(Finding::for_link(
                link,
                FindingKind::MissingFile,
                format!("Not found: {}", target.display()),
            ));
        }

        // '?' also splits off a topic, but only '#' names a heading
        let topic = link.url_topic();
        let names_heading = link.url().contains('#') && !topic.is_empty();

        if names_heading && target.is_file() && is_markdown(&target) && !self.has_anchor(&target, topic) {
            return Some(Finding::for_link(
                link,
                FindingKind::MissingAnchor,
                format!("No heading '#{}' in {}", topic, target.display()),
            ));
        }

        None
    }

    // Unknown files are parsed on first use; unreadable ones pass the check
    fn has_anchor(&mut self, target: &Path, topic: &str) -> bool {
        if !self.anchors.contains_key(target) {
            match Document::load(target) {
                Ok(document) => {
                    self.anchors.insert(target.to_path_buf(), anchor_ids(&document));
                }
                Err(e) => {
                    warn!("cannot read headings of {}: {:#}", target.display(), e);
                    return true;
                }
            }
        }

        self.anchors
            .get(target)
            .map_or(true, |ids| ids.contains(&topic.to_lowercase()))
    }
}

// Invalid UTF-8 escapes are replaced rather than failing the link
fn decode_target(path: &str) -> PathBuf {
    PathBuf::from(percent_decode_str(path).decode_utf8_lossy().into_owned())
}

// Heading ids are unique per document already; an explicit id or HTML
// anchor can still repeat one
fn anchor_ids(document: &Document) -> HashSet<String> {
    let mut ids: HashSet<String> = document
        .html_anchors
        .iter()
        .map(|anchor| anchor.to_lowercase())
        .collect();

    for heading in &document.headings {
        if !ids.insert(heading.id().to_lowercase()) {
            warn!("duplicate anchor id '{}' ({}) at {}", heading.id(), heading.title(), heading.location());
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan_documents;
    use std::fs;

    // Builds a small docs tree and returns (tempdir, docs root)
    fn docs_tree(index: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("guide")).unwrap();
        fs::create_dir_all(docs.join(".attachments")).unwrap();
        fs::write(docs.join("index.md"), index).unwrap();
        fs::write(docs.join("guide/setup.md"), "# Setup\n\n## Install Steps\n\n## Usage {#use}\n").unwrap();
        fs::write(docs.join(".attachments/logo.png"), [0u8; 8]).unwrap();
        fs::write(dir.path().join("outside.md"), "# Outside\n").unwrap();
        (dir, docs)
    }

    fn run(index: &str, strategy: RelativeLinkStrategy) -> (LocalReport, PathBuf, tempfile::TempDir) {
        let (dir, docs) = docs_tree(index);
        let documents = scan_documents(&docs, &[]).unwrap();
        let mut checker = LocalLinkChecker::new(&documents, docs.clone(), strategy);
        (checker.check(&documents), docs, dir)
    }

    fn kinds(report: &LocalReport) -> Vec<FindingKind> {
        report.findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_valid_links_pass() {
        let index = "# Home\n\n[setup](guide/setup.md) [steps](guide/setup.md#install-steps) \
                     [use](guide/setup.md#USE) [folder](guide) [top](#home) \
                     ![logo](.attachments/logo.png) [web](https://example.com) [mail](mailto:a@b.c)\n";
        let (report, docs, _dir) = run(index, RelativeLinkStrategy::All);

        assert!(report.findings.is_empty(), "{:?}", report.findings);
        assert!(report.referenced_resources.contains(&docs.join(".attachments/logo.png")));
    }

    #[test]
    fn test_missing_file_and_resource() {
        let index = "[gone](guide/missing.md) ![pic](.attachments/missing.png)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);
        assert_eq!(kinds(&report), vec![FindingKind::MissingFile, FindingKind::MissingFile]);
        assert_eq!(report.findings[0].line, Some(1));
        assert_eq!(report.findings[1].column, Some(26));
    }

    #[test]
    fn test_missing_anchor() {
        let index = "# Home\n\n[bad](guide/setup.md#nope) [self](#nowhere)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);
        assert_eq!(kinds(&report), vec![FindingKind::MissingAnchor, FindingKind::MissingAnchor]);
    }

    #[test]
    fn test_query_topic_is_not_a_heading() {
        let index = "[tabs](guide/setup.md?tabs=cli)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_anchor_in_unscanned_file_is_loaded() {
        let index = "[out](../outside.md#outside) [bad](../outside.md#inside)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);
        assert_eq!(kinds(&report), vec![FindingKind::MissingAnchor]);
    }

    #[test]
    fn test_same_hierarchy_strategy() {
        let index = "[out](../outside.md)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::SameDocsHierarchyOnly);
        assert_eq!(kinds(&report), vec![FindingKind::OutsideDocsHierarchy]);

        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_percent_encoded_targets_are_decoded() {
        let index = "[x](my%20file.md#notes) ![pic](.attachments/my%20logo.png)\n";
        let (_dir, docs) = docs_tree(index);
        fs::write(docs.join("my file.md"), "# Notes\n").unwrap();
        fs::write(docs.join(".attachments/my logo.png"), [0u8; 8]).unwrap();

        let documents = scan_documents(&docs, &[]).unwrap();
        let report = LocalLinkChecker::new(&documents, docs.clone(), RelativeLinkStrategy::All).check(&documents);

        assert!(report.findings.is_empty(), "{:?}", report.findings);
        assert!(report.referenced_resources.contains(&docs.join(".attachments/my logo.png")));
    }

    #[test]
    fn test_repeated_heading_anchors() {
        let index = "# Setup\n\n## Setup\n\n[first](#setup) [second](#setup-1) [third](#setup-2)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);

        assert_eq!(kinds(&report), vec![FindingKind::MissingAnchor]);
        assert_eq!(report.findings[0].url.as_deref(), Some("#setup-2"));
    }

    #[test]
    fn test_html_anchors_are_link_targets() {
        let index = "<a name=\"faq\"></a>\n\n# Home\n\n[faq](#faq) [old](#FAQ) [gone](#missing)\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);

        assert_eq!(kinds(&report), vec![FindingKind::MissingAnchor]);
        assert_eq!(report.findings[0].url.as_deref(), Some("#missing"));
    }

    #[test]
    fn test_empty_link() {
        let index = "[nothing]()\n";
        let (report, _docs, _dir) = run(index, RelativeLinkStrategy::All);
        assert_eq!(kinds(&report), vec![FindingKind::EmptyLink]);
    }
}
