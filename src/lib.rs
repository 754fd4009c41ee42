//! Kumo-Research: a deep research web crawler
//!
//! Given a natural-language query, this crate searches the web, crawls the
//! result set two levels deep with a polite concurrent fetcher, scores each
//! page for lexical relevance, and distills a summary plus a ranked list of
//! key findings into a structured [`model::ResearchResult`].

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod search;
pub mod url;

use thiserror::Error;

/// Main error type for Kumo-Research operations
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These surface to the caller before any network activity; every other
/// failure mode is recorded inside the research result instead of raised.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Kumo-Research operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{load_config, Config, OutputConfig, ResearchConfig};
pub use crawler::{research, Fetcher, HttpTransport, ReqwestTransport};
pub use model::{
    CrawlTask, ErrorKind, Failure, FetchOutcome, FetchStatus, Outlink, Page, Query,
    ResearchResult, ScoredPage, SearchHit,
};
pub use search::{SearchError, SearchProvider};
pub use crate::url::{normalize_url, registrable_domain};
