// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - A fixed pool of concurrent workers sharing one frontier queue
// - URL normalization (no fragments, no trailing slashes)
// - Same-site restriction via a substring scope check
// - Termination once the frontier is drained, then worker cancellation
//
// Submodules:
// - scope: pure URL normalization and scope predicate
// - frontier: the shared queue + visited set
// - crawler: the coordinator and its workers
// =============================================================================

mod crawler;
mod frontier;
mod scope;

pub use crawler::{CrawlConfig, CrawlSummary, Crawler, DEFAULT_FETCH_TIMEOUT, DEFAULT_WORKERS};
