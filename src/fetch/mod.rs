//! HTTP fetching for the crawl engine
//!
//! Two operations cover everything the workers need: pull a page body into
//! memory, or stream a response to a file on disk. Redirects follow the
//! client's default policy. There are no retries: crawling tolerates
//! transient loss, and the next seed may expose the same content anyway.

use crate::{Result, WecrError};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Builds the HTTP client shared by all workers
///
/// The client carries the configured user-agent and transparently
/// decompresses gzip/brotli bodies. Timeouts are applied per request since
/// page GETs and media downloads are bounded separately.
pub fn build_http_client(user_agent: &str) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs a single GET and reads the full body into memory
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `timeout_ms` - Per-request timeout; zero means no timeout
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The raw response body
/// * `Err(WecrError::Http)` - DNS, connect, timeout or read failure
pub async fn get_page(client: &Client, url: &str, timeout_ms: u64) -> Result<Vec<u8>> {
    let mut request = client.get(url);
    if timeout_ms > 0 {
        request = request.timeout(Duration::from_millis(timeout_ms));
    }

    let response = request.send().await.map_err(|source| WecrError::Http {
        url: url.to_string(),
        source,
    })?;

    let body = response.bytes().await.map_err(|source| WecrError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(body.to_vec())
}

/// Streams a response body to `path`
///
/// On error the partially written file is left as-is; callers log and move
/// on.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to download
/// * `timeout_ms` - Per-request timeout; zero means no timeout
/// * `path` - Destination file, created (or truncated) before writing
pub async fn fetch_file(client: &Client, url: &str, timeout_ms: u64, path: &Path) -> Result<()> {
    let mut request = client.get(url);
    if timeout_ms > 0 {
        request = request.timeout(Duration::from_millis(timeout_ms));
    }

    let mut response = request.send().await.map_err(|source| WecrError::Http {
        url: url.to_string(),
        source,
    })?;

    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = response.chunk().await.map_err(|source| WecrError::Http {
        url: url.to_string(),
        source,
    })? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}
