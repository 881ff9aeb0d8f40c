// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
//
// A check run goes: scan the docs folder -> local links -> web links
// (optional) -> orphaned resources (optional) -> report.
// =============================================================================

mod checker; // src/checker/ - link validation
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - settings file and defaults
mod error; // src/error.rs - hyperlink errors
mod markdown; // src/markdown/ - link and heading extraction
mod models; // src/models/ - hyperlink, heading, location
mod report; // src/report.rs - findings and output
mod scan; // src/scan/ - markdown file discovery

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands};
use models::Hyperlink;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = the check itself failed (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => handle_check(args).await,
        Commands::Classify { url, file } => handle_classify(&file, &url),
    }
}

// Logs go to stderr so they never mix with the JSON report on stdout
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// Handles the 'check' subcommand
async fn handle_check(args: CheckArgs) -> Result<i32> {
    let config = args.resolve_config()?;
    let json = args.json;

    // Scanning from an absolute root makes every link's file path absolute
    let docs_root = checker::absolute_path(&config.source_folder)?;
    info!(root = %docs_root.display(), "starting link check");

    if !json {
        println!("🔍 Scanning documentation folder: {}", docs_root.display());
    }

    let documents = scan::scan_documents(&docs_root, &config.exclude)?;
    let links_checked: usize = documents.iter().map(|d| d.links.len()).sum();

    if !json {
        println!("📄 Found {} markdown file(s) with {} link(s)\n", documents.len(), links_checked);
    }

    let mut local_checker = checker::LocalLinkChecker::new(&documents, docs_root.clone(), config.relative_link_strategy);
    let checker::LocalReport {
        mut findings,
        referenced_resources,
    } = local_checker.check(&documents);

    if config.validate_external_links {
        if !json {
            println!("🌐 Checking web links...\n");
        }
        findings.extend(checker::check_web_links(&documents, &config).await?);
    }

    if config.check_for_orphaned_resources {
        findings.extend(checker::find_orphaned_resources(
            &docs_root,
            &config.resource_folder_names,
            &config.exclude,
            &referenced_resources,
        )?);
    }

    report::print_findings(&findings, links_checked, json)?;

    Ok(report::exit_code(&findings))
}

// Everything the 'classify' subcommand prints
#[derive(Serialize)]
struct Classification<'a> {
    #[serde(flatten)]
    link: &'a Hyperlink,
    is_local: bool,
    is_web: bool,
    url_topic: &'a str,
    url_without_topic: &'a str,
    url_full_path: String,
}

// Handles the 'classify' subcommand
fn handle_classify(file: &str, url: &str) -> Result<i32> {
    let link = Hyperlink::new(file, 1, 1, url);
    let url_full_path = link
        .url_full_path()
        .with_context(|| format!("Cannot resolve '{}' from {}", url, file))?;

    let classification = Classification {
        link: &link,
        is_local: link.is_local(),
        is_web: link.is_web(),
        url_topic: link.url_topic(),
        url_without_topic: link.url_without_topic(),
        url_full_path,
    };

    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(0)
}
