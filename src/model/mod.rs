//! Core data model for the research pipeline
//!
//! This module defines the types flowing through the pipeline:
//! - Query tokenization and term matching
//! - Search hits, crawl tasks, and fetch outcomes
//! - Extracted pages and their scored counterparts
//! - The final assembled research result

mod page;
mod query;
mod result;

pub use page::{
    CrawlTask, ErrorKind, Failure, FetchOutcome, FetchStatus, Outlink, Page, ScoredPage,
    SearchHit,
};
pub use query::Query;
pub use result::ResearchResult;
