//! Crawler module: the research pipeline
//!
//! This module contains the pipeline stages and their driver:
//! - Concurrent HTTP fetching with politeness and retry logic
//! - HTML extraction of titles, text, and outlinks
//! - Lexical relevance scoring
//! - The two-level BFS planner
//! - Summary and key-findings synthesis

mod extractor;
mod fetcher;
mod planner;
mod scorer;
mod synthesizer;

pub use extractor::{extract, ExtractError, Extracted};
pub use fetcher::{
    Fetcher, HttpResponse, HttpTransport, ReqwestTransport, TransportError, MAX_REDIRECTS,
};
pub use planner::Planner;
pub use scorer::{ranking_cmp, score_page};
pub use synthesizer::{assemble, search_failure_note, SynthesisInput};

use crate::config::{validate_research, ResearchConfig};
use crate::model::ResearchResult;
use crate::search::SearchProvider;
use crate::KumoError;
use std::sync::Arc;

/// Runs a complete research operation
///
/// Validates the configuration, then drives search, both crawl levels, and
/// synthesis to completion. Content-level failures are folded into the
/// result; the only error returned from this function is a configuration
/// error raised before any network activity.
///
/// # Example
///
/// ```no_run
/// use kumo_research::config::ResearchConfig;
/// use kumo_research::crawler::{research, ReqwestTransport};
/// use kumo_research::search::DuckDuckGoProvider;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ResearchConfig::default();
/// let provider = Arc::new(DuckDuckGoProvider::new(&config.user_agent, Duration::from_secs(30))?);
/// let transport = Arc::new(ReqwestTransport::new(&config)?);
/// let result = research("rust async runtimes", config, provider, transport).await?;
/// println!("{}", result.summary);
/// # Ok(())
/// # }
/// ```
pub async fn research(
    query: &str,
    config: ResearchConfig,
    provider: Arc<dyn SearchProvider>,
    transport: Arc<dyn HttpTransport>,
) -> Result<ResearchResult, KumoError> {
    validate_research(&config)?;
    let planner = Planner::new(config, query, provider, transport);
    Ok(planner.run().await)
}
