// src/crawl/scope.rs
// =============================================================================
// This module decides which URLs belong to the crawl.
//
// Two pure functions live here:
// - normalize(): turns a URL into the form we store and compare
// - is_in_scope(): the scope + dedup predicate used by the workers
//
// Neither function touches shared state, so workers can call them freely
// without holding any lock other than the one protecting `visited`.
// =============================================================================

use std::collections::HashSet;

// Removes the fragment (everything from the first '#') from a URL
//
// Example:
//   "https://example.com/a#top" -> "https://example.com/a"
pub fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(index) => &url[..index],
        None => url,
    }
}

// Returns the canonical form of a URL: no fragment, no trailing slash
//
// "https://example.com/docs/#intro" and "https://example.com/docs"
// normalize to the same string, so they count as one page.
pub fn normalize(url: &str) -> String {
    strip_fragment(url).trim_end_matches('/').to_string()
}

// Checks whether a candidate URL should be crawled
//
// Parameters:
//   candidate: the URL found on a page (or pulled from the frontier)
//   base_url: the normalized URL the crawl started from
//   visited: URLs that were already claimed by a worker
//
// Returns false when the URL was already visited, or when it does not
// contain the base URL. Containment is a plain substring test, so
// "https://other.net/?next=https://example.com" is accepted for the base
// "https://example.com".
pub fn is_in_scope(candidate: &str, base_url: &str, visited: &HashSet<String>) -> bool {
    let url = strip_fragment(candidate);

    if visited.contains(url) {
        return false;
    }

    url.contains(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fragment() {
        assert_eq!(strip_fragment("http://x.com/a#top"), "http://x.com/a");
        assert_eq!(strip_fragment("http://x.com/a#top#again"), "http://x.com/a");
        assert_eq!(strip_fragment("http://x.com/a"), "http://x.com/a");
    }

    #[test]
    fn test_normalize_strips_fragment_and_trailing_slash() {
        assert_eq!(normalize("http://x.com/a#top"), "http://x.com/a");
        assert_eq!(normalize("http://x.com/a/"), "http://x.com/a");
        assert_eq!(normalize("http://x.com/a/#top"), "http://x.com/a");
        assert_eq!(normalize("http://x.com/"), "http://x.com");
    }

    #[test]
    fn test_trailing_slash_variants_are_one_entry() {
        assert_eq!(normalize("http://x.com/a/"), normalize("http://x.com/a"));
    }

    #[test]
    fn test_in_scope_when_unvisited_and_contains_base() {
        let visited = HashSet::new();
        assert!(is_in_scope("http://x.com/about", "http://x.com", &visited));
    }

    #[test]
    fn test_out_of_scope_other_site() {
        let visited = HashSet::new();
        assert!(!is_in_scope("http://y.com/about", "http://x.com", &visited));
    }

    #[test]
    fn test_visited_url_is_rejected_even_with_fragment() {
        let mut visited = HashSet::new();
        visited.insert("http://x.com/a".to_string());

        assert!(!is_in_scope("http://x.com/a", "http://x.com", &visited));
        assert!(!is_in_scope("http://x.com/a#section", "http://x.com", &visited));
    }

    #[test]
    fn test_substring_scope_is_permissive() {
        // The scope test is containment, not a host comparison
        let visited = HashSet::new();
        assert!(is_in_scope(
            "http://evil.com/?x=http://x.com",
            "http://x.com",
            &visited
        ));
    }
}
