// src/report.rs
// =============================================================================
// This module collects problems found by the checkers and prints them.
//
// Output formats:
// - Table: human-readable, one line per problem plus a summary
// - JSON: an array of findings for CI tooling (--json)
//
// Exit code policy (used by main):
//   0 = no errors (warnings are allowed)
//   1 = at least one error
// =============================================================================

use crate::models::Hyperlink;
use anyhow::Result;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// What went wrong with a link or resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// [text]() or a whitespace-only target
    EmptyLink,
    /// The local file or folder does not exist
    MissingFile,
    /// The target file exists but has no heading with that id
    MissingAnchor,
    /// The target lies outside the documentation folder
    OutsideDocsHierarchy,
    /// The target path could not be computed
    UnresolvablePath,
    /// The web link did not answer with a success or redirect
    BrokenWebLink,
    /// A resource in an attachments folder that nothing links to
    OrphanedResource,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FindingKind::EmptyLink => "EMPTY LINK",
            FindingKind::MissingFile => "MISSING FILE",
            FindingKind::MissingAnchor => "MISSING ANCHOR",
            FindingKind::OutsideDocsHierarchy => "OUTSIDE DOCS",
            FindingKind::UnresolvablePath => "BAD PATH",
            FindingKind::BrokenWebLink => "BROKEN WEB",
            FindingKind::OrphanedResource => "ORPHANED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub message: String,
}

impl Finding {
    // An error pointing at the link that caused it
    pub fn for_link(link: &Hyperlink, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            file: link.file_path().to_string(),
            line: Some(link.line()),
            column: Some(link.column()),
            url: Some(link.url().to_string()),
            message: message.into(),
        }
    }

    // A warning about a file rather than a link
    pub fn for_file(file: impl Into<String>, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            file: file.into(),
            line: None,
            column: None,
            url: None,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    // "path:line:column" when the position is known
    fn position(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{}:{}:{}", self.file, line, column),
            _ => self.file.clone(),
        }
    }
}

// Prints the findings either as a table or JSON
pub fn print_findings(findings: &[Finding], links_checked: usize, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(findings)?;
        println!("{}", json_output);
    } else {
        print_table(findings, links_checked);
    }
    Ok(())
}

fn print_table(findings: &[Finding], links_checked: usize) {
    if !findings.is_empty() {
        println!("{:<50} {:<16} {:<40} {}", "LOCATION", "PROBLEM", "LINK", "MESSAGE");
        println!("{}", "=".repeat(130));

        for finding in findings {
            let marker = match finding.severity {
                Severity::Error => "❌",
                Severity::Warning => "⚠️ ",
            };
            println!(
                "{:<50} {} {:<13} {:<40} {}",
                truncate(&finding.position(), 50),
                marker,
                finding.kind.to_string(),
                truncate(finding.url.as_deref().unwrap_or(""), 40),
                finding.message
            );
        }

        println!();
    }

    let error_count = findings.iter().filter(|f| f.is_error()).count();
    let warning_count = findings.len() - error_count;

    println!("📊 Summary:");
    println!("   🔗 Links checked: {}", links_checked);
    println!("   ❌ Errors: {}", error_count);
    println!("   ⚠️  Warnings: {}", warning_count);
}

// Shortens long values for the table, keeping the end of paths visible
fn truncate(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return value.to_string();
    }
    let tail: String = value.chars().skip(count - (width - 3)).collect();
    format!("...{}", tail)
}

/// 1 if any finding is an error, 0 otherwise
pub fn exit_code(findings: &[Finding]) -> i32 {
    if findings.iter().any(Finding::is_error) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_ignores_warnings() {
        let warning = Finding::for_file("/docs/.attachments/a.png", FindingKind::OrphanedResource, "not referenced");
        assert_eq!(exit_code(&[warning.clone()]), 0);

        let link = Hyperlink::new("/docs/a.md", 2, 3, "missing.md");
        let error = Finding::for_link(&link, FindingKind::MissingFile, "not found");
        assert_eq!(exit_code(&[warning, error]), 1);
        assert_eq!(exit_code(&[]), 0);
    }

    #[test]
    fn test_finding_json_shape() {
        let link = Hyperlink::new("/docs/a.md", 2, 3, "missing.md");
        let finding = Finding::for_link(&link, FindingKind::MissingFile, "not found");
        let json = serde_json::to_value(&finding).unwrap();

        assert_eq!(json["severity"], "error");
        assert_eq!(json["kind"], "missing_file");
        assert_eq!(json["line"], 2);
        assert_eq!(json["url"], "missing.md");

        let orphan = Finding::for_file("/docs/x.png", FindingKind::OrphanedResource, "unused");
        let json = serde_json::to_value(&orphan).unwrap();
        assert!(json.get("line").is_none());
    }

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("/a/very/long/path.md", 10), "...path.md");
    }
}
