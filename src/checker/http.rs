// src/checker/http.rs
// =============================================================================
// This module checks if web links are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET when a server refuses HEAD (405)
// - Detects various failure modes (404, timeout, SSL errors, etc.)
// - Runs checks concurrently with a configurable limit
// - Reports every occurrence of a broken url at its line and column
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Streams: For processing many requests with a concurrency limit
// - Enums: To represent different link states
// =============================================================================

use crate::config::AppConfig;
use crate::models::{Hyperlink, LinkType};
use crate::report::{Finding, FindingKind};
use crate::scan::Document;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::{Client, StatusCode};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

// Represents the status of a web link after checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Link is working (2xx)
    Ok,
    /// Link redirects to another URL (3xx), holds the target
    Redirect(String),
    /// Link is broken (404, 410)
    Broken,
    /// Request timed out
    Timeout,
    /// SSL/TLS certificate error
    SslError,
    /// Too many redirects (redirect loop)
    TooManyRedirects,
    /// Could not resolve hostname
    DnsError,
    /// Other error, including urls that don't parse
    Error,
}

// The result of checking a single url
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCheckResult {
    pub url: String,
    pub status: LinkStatus,
    pub message: Option<String>,
}

impl LinkCheckResult {
    /// Returns true for Ok and Redirect statuses
    pub fn is_ok(&self) -> bool {
        matches!(self.status, LinkStatus::Ok | LinkStatus::Redirect(_))
    }
}

// Checks all webpage links of the scanned documents
//
// Each unique url is requested once; every link that uses a failing url
// becomes a finding. ftp links and whitelisted urls are skipped.
pub async fn check_web_links(documents: &[Document], config: &AppConfig) -> Result<Vec<Finding>> {
    let mut occurrences: HashMap<&str, Vec<&Hyperlink>> = HashMap::new();
    let mut skipped = 0;

    for link in documents.iter().flat_map(|document| &document.links) {
        match link.link_type() {
            LinkType::Webpage if !is_whitelisted(link.url(), &config.whitelist_urls) => {
                occurrences.entry(link.url()).or_default().push(link);
            }
            LinkType::Webpage | LinkType::Ftp => skipped += 1,
            _ => {}
        }
    }

    debug!(skipped, "web links not requested (ftp or whitelisted)");

    // BTreeSet keeps the request order stable between runs
    let urls: BTreeSet<String> = occurrences.keys().map(|url| url.to_string()).collect();
    info!(count = urls.len(), "checking unique web links");

    let client = build_client(config)?;
    let results = check_links(&client, urls.into_iter().collect(), config.concurrency_level).await;

    let mut findings = Vec::new();
    for result in results.iter().filter(|result| !result.is_ok()) {
        let message = result
            .message
            .clone()
            .unwrap_or_else(|| format!("{:?}", result.status));

        for link in occurrences.get(result.url.as_str()).into_iter().flatten() {
            findings.push(Finding::for_link(link, FindingKind::BrokenWebLink, message.clone()));
        }
    }

    // buffer_unordered returns results as they complete
    findings.sort_by(|a, b| (&a.file, a.line, a.column).cmp(&(&b.file, b.line, b.column)));
    Ok(findings)
}

fn is_whitelisted(url: &str, whitelist: &[String]) -> bool {
    whitelist.iter().any(|prefix| url.starts_with(prefix.as_str()))
}

// One client for all requests (connection pooling)
fn build_client(config: &AppConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(config.max_http_redirects))
        .user_agent(concat!("doc-link-checker/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

// Checks multiple urls concurrently, at most `concurrency` at a time
pub async fn check_links(client: &Client, urls: Vec<String>, concurrency: usize) -> Vec<LinkCheckResult> {
    let futures = urls.into_iter().map(|url| {
        let client = client.clone();
        async move { check_single_link(client, url).await }
    });

    stream::iter(futures)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

async fn check_single_link(client: Client, url: String) -> LinkCheckResult {
    // Don't send requests for urls that can't be valid
    if let Err(e) = Url::parse(&url) {
        return LinkCheckResult {
            url,
            status: LinkStatus::Error,
            message: Some(format!("Invalid URL: {}", e)),
        };
    }

    // First, try a HEAD request (faster, no body download)
    let result = match client.head(&url).send().await {
        // Some servers only implement GET
        Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => {
            debug!(url = %url, "HEAD not allowed, retrying with GET");
            client.get(&url).send().await
        }
        other => other,
    };

    match result {
        Ok(response) => {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            analyze_status(url, response.status(), location)
        }
        Err(e) => categorize_error(url, e),
    }
}

// Maps an HTTP status code to a link status
//
// - 200-299: Success
// - 300-399: Redirect
// - 404, 410: Broken
// - anything else: Error
fn analyze_status(url: String, status_code: StatusCode, location: Option<String>) -> LinkCheckResult {
    let code = status_code.as_u16();

    let (status, message) = if status_code.is_success() {
        (LinkStatus::Ok, format!("HTTP {}", code))
    } else if status_code.is_redirection() {
        let target = location.unwrap_or_else(|| "unknown".to_string());
        let message = format!("HTTP {} -> {}", code, target);
        (LinkStatus::Redirect(target), message)
    } else if matches!(status_code, StatusCode::NOT_FOUND | StatusCode::GONE) {
        (LinkStatus::Broken, format!("HTTP {}", code))
    } else {
        (LinkStatus::Error, format!("HTTP {}", code))
    };

    LinkCheckResult {
        url,
        status,
        message: Some(message),
    }
}

// Categorizes different error types from reqwest
fn categorize_error(url: String, error: reqwest::Error) -> LinkCheckResult {
    let error_string = error.to_string();

    let (status, message) = if error.is_timeout() {
        (LinkStatus::Timeout, "Request timed out".to_string())
    } else if error.is_redirect() {
        (LinkStatus::TooManyRedirects, "Too many redirects".to_string())
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            (LinkStatus::DnsError, "Could not resolve hostname".to_string())
        } else {
            (LinkStatus::Error, "Connection failed".to_string())
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        (LinkStatus::SslError, "SSL certificate error".to_string())
    } else {
        (LinkStatus::Error, error_string)
    };

    LinkCheckResult {
        url,
        status,
        message: Some(message),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is StreamExt and buffer_unordered?
//    - StreamExt is a trait that adds methods to streams
//    - buffer_unordered(N) runs up to N futures concurrently
//    - Results come back in completion order, so we sort the findings
//
// 2. Why clone the client?
//    - Each async task needs its own handle to the client
//    - Client is cheap to clone (it's a reference counter internally)
//
// 3. Why group links by url first?
//    - The same url is often linked from many pages
//    - One request per url, then one finding per place it's used
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_link_result_is_ok() {
        let ok_result = LinkCheckResult {
            url: "https://example.com".to_string(),
            status: LinkStatus::Ok,
            message: None,
        };
        assert!(ok_result.is_ok());

        let redirect = LinkCheckResult {
            status: LinkStatus::Redirect("https://example.org".to_string()),
            ..ok_result.clone()
        };
        assert!(redirect.is_ok());

        let broken_result = LinkCheckResult {
            status: LinkStatus::Broken,
            ..ok_result
        };
        assert!(!broken_result.is_ok());
    }

    #[test]
    fn test_analyze_status_codes() {
        let url = || "https://example.com".to_string();

        assert_eq!(analyze_status(url(), StatusCode::OK, None).status, LinkStatus::Ok);
        assert_eq!(analyze_status(url(), StatusCode::NOT_FOUND, None).status, LinkStatus::Broken);
        assert_eq!(analyze_status(url(), StatusCode::GONE, None).status, LinkStatus::Broken);
        assert_eq!(
            analyze_status(url(), StatusCode::INTERNAL_SERVER_ERROR, None).status,
            LinkStatus::Error
        );

        let redirect = analyze_status(url(), StatusCode::MOVED_PERMANENTLY, Some("https://example.org".to_string()));
        assert_eq!(redirect.status, LinkStatus::Redirect("https://example.org".to_string()));
        assert_eq!(redirect.message.as_deref(), Some("HTTP 301 -> https://example.org"));
    }

    #[test]
    fn test_whitelist_prefix() {
        let whitelist = vec!["https://localhost".to_string()];
        assert!(is_whitelisted("https://localhost:8080/api", &whitelist));
        assert!(!is_whitelisted("https://example.com", &whitelist));
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_requested() {
        let client = Client::new();
        let results = check_links(&client, vec!["http://exa mple.com".to_string()], 4).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, LinkStatus::Error);
        assert!(results[0].message.as_deref().unwrap().starts_with("Invalid URL"));
    }

    #[tokio::test]
    async fn test_invalid_url_reported_at_each_occurrence() {
        let document = Document {
            path: PathBuf::from("/docs/a.md"),
            links: vec![
                Hyperlink::new("/docs/a.md", 1, 1, "http://exa mple.com"),
                Hyperlink::new("/docs/a.md", 5, 3, "http://exa mple.com"),
                Hyperlink::new("/docs/a.md", 6, 1, "ftp://files.example.com"),
                Hyperlink::new("/docs/a.md", 7, 1, "https://localhost/skip"),
            ],
            headings: Vec::new(),
            html_anchors: Vec::new(),
        };
        let config = AppConfig {
            whitelist_urls: vec!["https://localhost".to_string()],
            ..AppConfig::default()
        };

        let findings = check_web_links(&[document], &config).await.unwrap();
        let lines: Vec<Option<usize>> = findings.iter().map(|f| f.line).collect();

        assert_eq!(lines, vec![Some(1), Some(5)]);
        assert!(findings.iter().all(|f| f.kind == FindingKind::BrokenWebLink));
    }
}
