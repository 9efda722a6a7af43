// src/fetch/mod.rs
// =============================================================================
// This module holds the two capabilities the crawl engine needs from the
// outside world:
// - Fetcher: download a page and return its body as text
// - LinkExtractor: find the links inside that text
//
// The crawler only talks to these traits, never to reqwest or scraper
// directly. Production code plugs in HttpFetcher and HtmlLinkExtractor;
// tests plug in an in-memory site.
//
// Submodules:
// - http: reqwest-backed Fetcher and the FetchError type
// - html: scraper-backed LinkExtractor
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;

pub use html::HtmlLinkExtractor;
pub use http::{FetchError, HttpFetcher};

/// Downloads a page body.
///
/// Implementations should enforce their own timeout, but the crawler also
/// bounds every call, so a hanging implementation cannot stall a worker.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Finds the absolute URLs linked from an HTML document.
///
/// Malformed markup is not an error: it just yields fewer links.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str, base_url: &str) -> Vec<String>;
}
