//! The final assembled research result

use crate::model::{Failure, ScoredPage, SearchHit};
use chrono::{DateTime, Utc};

/// Everything a research run produced
///
/// Produced exactly once per run by the synthesizer. Runs that fail at the
/// search stage or hit the deadline still produce a complete (if degraded)
/// result; the only condition raised to the caller is a configuration error
/// before the run starts.
#[derive(Debug, Clone)]
pub struct ResearchResult {
    /// The original query string
    pub query: String,

    /// Run start time
    pub started_at: DateTime<Utc>,

    /// Run completion time
    pub finished_at: DateTime<Utc>,

    /// Total run duration in seconds
    pub elapsed_seconds: f64,

    /// Search hits as returned by the provider (capped at the configured limit)
    pub initial_hits: Vec<SearchHit>,

    /// Successfully crawled search-hit pages, in ranking order
    pub level1_pages: Vec<ScoredPage>,

    /// Successfully crawled linked pages, in ranking order
    pub level2_pages: Vec<ScoredPage>,

    /// Bounded prose summary; empty when no page was crawled
    pub summary: String,

    /// Ranked list of short findings bullets
    pub key_findings: Vec<String>,

    /// `level1_pages.len() + level2_pages.len()`
    pub total_pages_crawled: usize,

    /// Sum of outlinks across Level-1 pages, before Level-2 filtering
    pub total_links_discovered: usize,

    /// Per-URL failures accumulated across the run
    pub failures: Vec<Failure>,
}

impl ResearchResult {
    /// Iterates over all crawled pages, Level-1 first
    pub fn all_pages(&self) -> impl Iterator<Item = &ScoredPage> {
        self.level1_pages.iter().chain(self.level2_pages.iter())
    }
}
