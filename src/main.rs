// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the base URL (scheme + host required)
// 3. Crawl the site with a pool of workers
// 4. Write the sitemap to a file or stdout
// 5. Print a completion summary
// 6. Exit with proper code (0 = success, 1 = invalid URL, 2 = error)
// =============================================================================

mod cli;           // src/cli.rs - command-line parsing
mod crawl;         // src/crawl/ - the concurrent crawl engine
mod fetch;         // src/fetch/ - HTTP fetching and link extraction
mod sitemap;       // src/sitemap/ - XML rendering

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{CrawlConfig, CrawlSummary, Crawler};
use fetch::{HtmlLinkExtractor, HttpFetcher};
use sitemap::Destination;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected failure (e.g. output file not writable)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = sitemap generated
//   Ok(1) = base URL rejected
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli::parse_base_url(&cli.url).is_none() {
        eprintln!("URL is not valid, please enter a valid one i.e: http://centione.com");
        return Ok(1);
    }

    let started = Instant::now();

    let timeout = Duration::from_secs(cli.timeout);
    let fetcher = HttpFetcher::new(timeout).context("failed to build HTTP client")?;
    let config = CrawlConfig::new(cli.url.clone())
        .with_workers(cli.num)
        .with_fetch_timeout(timeout);

    let mut crawler = Crawler::new(config, Arc::new(fetcher), Arc::new(HtmlLinkExtractor::new()))?;
    let result = crawler.run().await;

    let destination = Destination::from(cli.output);
    sitemap::write_sitemap(&result.urls, &destination)?;

    let summary = result.summary(started.elapsed());
    print_summary(&summary, cli.json)?;

    Ok(0)
}

// Sends tracing output to stderr so stdout only carries the sitemap
//
// RUST_LOG wins when set; otherwise warnings only (info with --verbose).
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!(
            "Sitemap Generated for {} in {:.3} seconds with {} URLs",
            summary.base_url, summary.elapsed_secs, summary.url_count
        );
    }
    Ok(())
}
