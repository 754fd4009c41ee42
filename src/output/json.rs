//! JSON wire document
//!
//! The flattened, serializable form of a research result. Downstream
//! emitters (JSON file, PDF renderer) consume this schema; page text is
//! reduced to a bounded excerpt.

use crate::model::{Failure, ResearchResult, ScoredPage, SearchHit};
use crate::output::OutputResult;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Characters of page text carried in the wire document
const EXCERPT_CHARS: usize = 500;

/// The wire form of a research result
#[derive(Debug, Serialize)]
pub struct ResearchDocument {
    pub query: String,
    pub started_at: String,
    pub finished_at: String,
    pub elapsed_seconds: f64,
    pub initial_hits: Vec<SearchHit>,
    pub level1_pages: Vec<Level1Entry>,
    pub level2_pages: Vec<Level2Entry>,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub total_pages_crawled: usize,
    pub total_links_discovered: usize,
    pub failures: Vec<Failure>,
}

/// Wire form of a crawled search-hit page
#[derive(Debug, Serialize)]
pub struct Level1Entry {
    pub url: String,
    pub title: String,
    pub text_excerpt: String,
    pub outlinks_count: usize,
    pub relevance: f64,
    pub fetch_elapsed_ms: u64,
}

/// Wire form of a crawled linked page
#[derive(Debug, Serialize)]
pub struct Level2Entry {
    pub url: String,
    pub parent_url: String,
    pub title: String,
    pub text_excerpt: String,
    pub relevance: f64,
    pub fetch_elapsed_ms: u64,
}

/// Flattens a research result into its wire form
pub fn document(result: &ResearchResult) -> ResearchDocument {
    ResearchDocument {
        query: result.query.clone(),
        started_at: result.started_at.to_rfc3339(),
        finished_at: result.finished_at.to_rfc3339(),
        elapsed_seconds: result.elapsed_seconds,
        initial_hits: result.initial_hits.clone(),
        level1_pages: result.level1_pages.iter().map(level1_entry).collect(),
        level2_pages: result.level2_pages.iter().map(level2_entry).collect(),
        summary: result.summary.clone(),
        key_findings: result.key_findings.clone(),
        total_pages_crawled: result.total_pages_crawled,
        total_links_discovered: result.total_links_discovered,
        failures: result.failures.clone(),
    }
}

/// Serializes a research result as pretty-printed JSON
pub fn to_json_string(result: &ResearchResult) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&document(result))?)
}

/// Writes the JSON wire document to a file
pub fn write_json(result: &ResearchResult, path: &Path) -> OutputResult<()> {
    let json = to_json_string(result)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn level1_entry(page: &ScoredPage) -> Level1Entry {
    Level1Entry {
        url: page.page.url.clone(),
        title: page.page.title.clone(),
        text_excerpt: excerpt(&page.page.text),
        outlinks_count: page.page.outlinks.len(),
        relevance: page.relevance,
        fetch_elapsed_ms: page.page.fetch_elapsed_ms,
    }
}

fn level2_entry(page: &ScoredPage) -> Level2Entry {
    Level2Entry {
        url: page.page.url.clone(),
        parent_url: page.page.parent_url.clone().unwrap_or_default(),
        title: page.page.title.clone(),
        text_excerpt: excerpt(&page.page.text),
        relevance: page.relevance,
        fetch_elapsed_ms: page.page.fetch_elapsed_ms,
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        text.chars().take(EXCERPT_CHARS).collect()
    }
}
