//! Wecr: crawl the web for data
//!
//! This crate implements a concurrent web crawler that discovers, downloads
//! and extracts matching content from pages reachable from a set of seed
//! URLs. A pool of identical workers consumes jobs from a shared frontier,
//! fetches HTML, extracts links and typed media references, evaluates the
//! configured search against each page and persists matching artifacts to a
//! structured output tree.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod output;
pub mod worker;

use thiserror::Error;

/// Main error type for Wecr operations
#[derive(Debug, Error)]
pub enum WecrError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON encode/decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontier closed")]
    FrontierClosed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Wecr operations
pub type Result<T> = std::result::Result<T, WecrError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Search};
pub use frontier::{Frontier, Job};
pub use output::Finding;
pub use worker::{Pool, Statistics};
