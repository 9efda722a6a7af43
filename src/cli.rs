// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below describes every argument,
// and clap generates parsing, --help and --version from it.
//
// Usage:
//   sitemap-crawler https://example.com
//   sitemap-crawler https://example.com -n 10 -o sitemap.xml
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::crawl::{DEFAULT_FETCH_TIMEOUT, DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-crawler",
    version,
    about = "Crawl a website and generate an XML sitemap",
    long_about = "sitemap-crawler starts at a base URL, follows every same-site link it finds \
                  with a pool of concurrent workers, and writes a sitemap listing each page."
)]
pub struct Cli {
    /// Base URL to generate the sitemap for (e.g., https://example.com)
    pub url: String,

    /// Number of pages fetched in parallel
    #[arg(short = 'n', long = "num", default_value_t = DEFAULT_WORKERS)]
    pub num: usize,

    /// Output sitemap file; if omitted the sitemap is printed on stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds to wait for a single page before giving up on it
    #[arg(short, long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Print the completion summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log crawl progress to stderr (same as RUST_LOG=info)
    #[arg(short, long)]
    pub verbose: bool,
}

// Checks that the base URL has both a scheme and a host
//
// Returns the parsed URL, or None for input like "example.com" (no scheme),
// "mailto:someone@example.com" (no host) or "http:example.com" (no "//").
pub fn parse_base_url(input: &str) -> Option<Url> {
    let input = input.trim();
    let url = Url::parse(input).ok()?;

    // Url::parse fills in a host for "http:example.com"; an authority needs "//"
    let after_scheme = input.get(url.scheme().len()..)?;
    if !after_scheme.starts_with("://") {
        return None;
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["sitemap-crawler", "https://example.com"]);
        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.num, 5);
        assert_eq!(cli.output, None);
        assert_eq!(cli.timeout, 10);
        assert!(!cli.json);
    }

    #[test]
    fn test_short_and_long_flags() {
        let cli = Cli::parse_from(["sitemap-crawler", "https://example.com", "-n", "8", "-o", "map.xml"]);
        assert_eq!(cli.num, 8);
        assert_eq!(cli.output, Some(PathBuf::from("map.xml")));

        let cli = Cli::parse_from([
            "sitemap-crawler",
            "--num",
            "2",
            "--output",
            "out.xml",
            "https://example.com",
        ]);
        assert_eq!(cli.num, 2);
        assert_eq!(cli.output, Some(PathBuf::from("out.xml")));
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["sitemap-crawler"]).is_err());
    }

    #[test]
    fn test_valid_base_urls() {
        assert!(parse_base_url("http://centione.com").is_some());
        assert!(parse_base_url("https://example.com/blog/").is_some());
    }

    #[test]
    fn test_invalid_base_urls() {
        assert!(parse_base_url("example.com").is_none());
        assert!(parse_base_url("mailto:someone@example.com").is_none());
        assert!(parse_base_url("").is_none());
        assert!(parse_base_url("http:example.com").is_none());
        assert!(parse_base_url("http:/example.com").is_none());
    }
}
