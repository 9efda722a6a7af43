// src/crawl/crawler.rs
// =============================================================================
// This module runs the crawl: a fixed pool of workers sharing one frontier.
//
// How it works:
// 1. Seed the frontier with the base URL
// 2. Spawn N workers. Each one loops:
//      dequeue -> check scope -> claim (mark visited) -> fetch
//      -> extract links -> enqueue in-scope links -> task_done
// 3. Wait on frontier.join() until every queued URL has been processed
// 4. Close the frontier and abort the workers (some are parked in dequeue)
// 5. Hand back the visited set
//
// Failure handling:
// - A failed or timed-out fetch is logged and counted, nothing more
// - The worker always reaches task_done(), otherwise join() would hang
// =============================================================================

use anyhow::{ensure, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use super::frontier::Frontier;
use super::scope::normalize;
use crate::fetch::{FetchError, Fetcher, LinkExtractor};

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// Settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub workers: usize,
    pub fetch_timeout: Duration,
}

impl CrawlConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    // The base URL the way url::Url prints it: lowercase host, no default port
    //
    // Discovered links come out of Url::join in this form, so the scope
    // check only works when the base is written the same way.
    fn canonical_base(&self) -> String {
        match Url::parse(&self.base_url) {
            Ok(url) => url.to_string(),
            Err(_) => self.base_url.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.workers > 0, "worker count must be at least 1");
        ensure!(!self.fetch_timeout.is_zero(), "fetch timeout must be non-zero");
        ensure!(!normalize(&self.base_url).is_empty(), "base URL is empty");
        Ok(())
    }
}

/// Lifecycle of a [`Crawler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Frontier seeded, no workers yet
    Idle,
    /// Workers spawned
    Running,
    /// Waiting for the frontier to drain
    Draining,
    /// Workers stopped, result handed out
    Terminated,
}

// What a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlResult {
    pub base_url: String,
    pub urls: HashSet<String>,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub links_found: usize,
    pub crawl_time: Duration,
}

impl CrawlResult {
    // Builds the summary printed at the end of a run
    //
    // `elapsed` covers the whole generation (crawl plus rendering), so the
    // caller measures it rather than using `crawl_time`.
    pub fn summary(&self, elapsed: Duration) -> CrawlSummary {
        CrawlSummary {
            base_url: self.base_url.clone(),
            elapsed_secs: elapsed.as_secs_f64(),
            url_count: self.urls.len(),
            pages_fetched: self.pages_fetched,
            fetch_failures: self.fetch_failures,
            links_found: self.links_found,
        }
    }
}

// Serializable completion summary (for --json)
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub base_url: String,
    pub elapsed_secs: f64,
    pub url_count: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub links_found: usize,
}

// Counters shared by all workers
#[derive(Debug, Default)]
struct CrawlStats {
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    links_found: AtomicUsize,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    phase: CrawlPhase,
}

impl Crawler {
    // Creates a crawler from a config and the two injected capabilities
    //
    // Fails if the config can't produce a crawl that terminates (e.g. zero workers).
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher,
            extractor,
            phase: CrawlPhase::Idle,
        })
    }

    #[cfg(test)]
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: CrawlPhase) {
        debug!(from = ?self.phase, to = ?phase, "crawl phase change");
        self.phase = phase;
    }

    // Runs the crawl to completion and returns every visited URL
    pub async fn run(&mut self) -> CrawlResult {
        let started = Instant::now();
        let link_base = self.config.canonical_base();
        let base_url = normalize(&link_base);
        let frontier = Arc::new(Frontier::new());
        let stats = Arc::new(CrawlStats::default());

        // The seed goes in unfiltered; workers validate it on dequeue
        frontier.enqueue(base_url.clone()).await;

        info!(
            base_url = %base_url,
            workers = self.config.workers,
            timeout = ?self.config.fetch_timeout,
            "starting crawl"
        );

        let mut workers = JoinSet::new();
        for id in 0..self.config.workers {
            let worker = Worker {
                id,
                base_url: base_url.clone(),
                link_base: link_base.clone(),
                fetch_timeout: self.config.fetch_timeout,
                frontier: Arc::clone(&frontier),
                fetcher: Arc::clone(&self.fetcher),
                extractor: Arc::clone(&self.extractor),
                stats: Arc::clone(&stats),
            };
            workers.spawn(worker.run());
        }
        self.set_phase(CrawlPhase::Running);
        debug!(spawned = workers.len(), "worker pool running");

        self.set_phase(CrawlPhase::Draining);
        frontier.join().await;

        // Drained: stop everyone, including workers parked in dequeue()
        frontier.close().await;
        workers.shutdown().await;
        self.set_phase(CrawlPhase::Terminated);

        let urls = frontier.visited_snapshot().await;
        let result = CrawlResult {
            base_url,
            urls,
            pages_fetched: stats.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: stats.fetch_failures.load(Ordering::Relaxed),
            links_found: stats.links_found.load(Ordering::Relaxed),
            crawl_time: started.elapsed(),
        };

        info!(
            urls = result.urls.len(),
            fetched = result.pages_fetched,
            failures = result.fetch_failures,
            links = result.links_found,
            elapsed = ?result.crawl_time,
            "crawl finished"
        );

        result
    }
}

// One member of the pool. Owns clones of everything it needs.
struct Worker {
    id: usize,
    // Normalized base, used for the scope check
    base_url: String,
    // Canonical base before normalizing, used to resolve relative links
    link_base: String,
    fetch_timeout: Duration,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    stats: Arc<CrawlStats>,
}

impl Worker {
    async fn run(self) {
        debug!(worker = self.id, "worker started");

        while let Some(url) = self.frontier.dequeue().await {
            self.process(url).await;
            self.frontier.task_done().await;
        }

        debug!(worker = self.id, "worker stopped");
    }

    // Handles one frontier entry. Every early return still ends in task_done().
    async fn process(&self, url: String) {
        let url = normalize(&url);

        if !self.frontier.admits(&url, &self.base_url).await {
            return;
        }
        if !self.frontier.mark_visited(&url).await {
            // Another worker claimed it between the scope check and here
            return;
        }

        let html = match self.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(worker = self.id, %url, error = %e, "failed to fetch page");
                self.stats.fetch_failures.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        self.stats.pages_fetched.fetch_add(1, Ordering::Relaxed);

        let links = self.extractor.extract_links(&html, &self.link_base);
        debug!(worker = self.id, %url, links = links.len(), "page fetched");

        for link in links {
            let link = normalize(&link);
            if self.frontier.admits(&link, &self.base_url).await {
                self.stats.links_found.fetch_add(1, Ordering::Relaxed);
                self.frontier.enqueue(link).await;
            }
        }
    }

    // Bounds the injected fetcher with our own timeout
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match timeout(self.fetch_timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout)),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Arc<dyn Fetcher>?
//    - dyn Fetcher is "some type implementing Fetcher", decided at runtime
//    - Arc lets every worker share the same fetcher without copying it
//    - Tests pass a fake site, main passes the real HTTP client
//
// 2. What does JoinSet::shutdown() do?
//    - Aborts every task in the set and waits until they are gone
//    - Workers parked in dequeue() or stuck in a fetch are simply dropped
//
// 3. Why AtomicUsize for the counters?
//    - Many workers bump them at once
//    - fetch_add is a lock-free increment; Relaxed is enough because we only
//      read the totals after every worker has stopped
// -----------------------------------------------------------------------------
