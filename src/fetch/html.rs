// src/fetch/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (it never fails, broken markup is repaired)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve relative hrefs against a base URL.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

use super::LinkExtractor;

// Pulls every <a href> out of a page
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    anchors: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        // "a[href]" is a constant selector, parsing it cannot fail
        let anchors = Selector::parse("a[href]").expect("valid anchor selector");
        Self { anchors }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    // Returns absolute http(s) URLs for all anchors in `html`
    //
    // Parameters:
    //   html: the page body
    //   base_url: the URL relative hrefs are resolved against
    //
    // Example:
    //   html = "<a href='/docs'>Docs</a>"
    //   base_url = "https://example.com"
    //   result = ["https://example.com/docs"]
    fn extract_links(&self, html: &str, base_url: &str) -> Vec<String> {
        let base = match Url::parse(base_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(base_url, error = %e, "cannot resolve links against invalid base url");
                return Vec::new();
            }
        };

        let document = Html::parse_document(html);

        document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_url(&base, href))
            .filter(|url| is_crawlable_link(url))
            .collect()
    }
}

// Resolves a possibly-relative href to an absolute URL
//
// Url::join handles both cases: an absolute href replaces the base,
// a relative one is resolved like a browser would.
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(|url| url.to_string())
}

// mailto:, tel:, javascript: and friends are never pages we can crawl
fn is_crawlable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, base: &str) -> Vec<String> {
        HtmlLinkExtractor::new().extract_links(html, base)
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract(html, "https://example.com");
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_fragment_is_kept_for_the_crawler_to_strip() {
        let html = r##"<a href="#top">Top</a>"##;
        let links = extract(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/page#top"]);
    }

    #[test]
    fn test_skip_mailto_and_javascript() {
        let html = r#"
            <a href="mailto:test@example.com">Email</a>
            <a href="javascript:void(0)">Nothing</a>
        "#;
        assert!(extract(html, "https://example.com").is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let html = r#"<a name="x">No link</a><a href="/a">A</a>"#;
        assert_eq!(extract(html, "https://example.com"), vec!["https://example.com/a"]);
    }

    #[test]
    fn test_malformed_html_yields_what_it_can() {
        let html = r#"<div><a href="/ok">ok<p><a href="/also"</div>"#;
        let links = extract(html, "https://example.com");
        assert!(links.contains(&"https://example.com/ok".to_string()));
    }

    #[test]
    fn test_invalid_base_url_yields_nothing() {
        let html = r#"<a href="/docs">Docs</a>"#;
        assert!(extract(html, "not a url").is_empty());
    }
}
