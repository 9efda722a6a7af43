// src/fetch/http.rs
// =============================================================================
// This module downloads pages over HTTP.
//
// Key functionality:
// - One shared reqwest Client (connection pooling across workers)
// - A hard per-request timeout so a slow server can't hang a worker
// - Failures are sorted into a few categories (timeout, connect, status...)
//   so the crawl log says why a page was skipped
//
// Rust concepts:
// - async_trait: Lets a trait have async methods and still be used as dyn Trait
// - thiserror: Generates Display/Error impls for our error enum
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use super::Fetcher;

// Why fetching a page failed
//
// None of these stop the crawl. The worker logs the error and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request took longer than the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Could not connect (DNS failure, refused connection...)
    #[error("connection failed: {0}")]
    Connect(String),
    /// Server answered with a non-success status code
    #[error("HTTP {0}")]
    Status(StatusCode),
    /// Anything else reqwest reports (bad body encoding, redirect loop...)
    #[error("request failed: {0}")]
    Other(String),
}

// Fetches pages with reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    // Builds a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    // Sorts a reqwest error into one of our categories
    fn categorize_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::Status(status)
        } else {
            FetchError::Other(error.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.categorize_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.text().await.map_err(|e| self.categorize_error(e))
    }
}
