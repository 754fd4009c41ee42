//! Search provider interface
//!
//! The research pipeline depends on the `{search}` capability only; any
//! implementation backed by a public search endpoint (or a canned test
//! double) can sit behind [`SearchProvider`].

mod duckduckgo;

pub use duckduckgo::DuckDuckGoProvider;

use crate::model::SearchHit;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a search provider can report
///
/// A provider error never aborts the run; the planner records it as a
/// search failure and produces an empty-but-complete result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(String),

    #[error("failed to parse search results: {0}")]
    Parse(String),
}

/// The `{search}` capability consumed by the planner
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs a query and returns up to `limit` hits in provider order
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}
