//! Lexical relevance scoring
//!
//! The score is deterministic and purely lexical: term coverage, body hit
//! density, and a title boost, combined as
//! `0.5 * coverage + 0.3 * density + 0.2 * title_boost` and clamped to
//! `[0, 1]`. Density saturates at one body hit per ~500 characters of text.
//!
//! `ranking_cmp` defines the total order used for every ranked output:
//! relevance descending, then level ascending, then origin rank ascending,
//! then URL ascending.

use crate::model::{Page, Query, ScoredPage};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Characters of body text that one hit saturates in the density term
const DENSITY_WINDOW: f64 = 500.0;

/// Scores a page against the query
pub fn score_page(page: Page, query: &Query) -> ScoredPage {
    let text = page.text.to_lowercase();
    let title = page.title.to_lowercase();

    let mut term_hits = BTreeMap::new();
    let mut body_total = 0usize;
    let mut title_total = 0usize;
    let mut covered = 0usize;

    for term in query.terms() {
        let body_hits = count_occurrences(&text, term);
        let title_hits = count_occurrences(&title, term);
        if body_hits + title_hits > 0 {
            covered += 1;
        }
        body_total += body_hits;
        title_total += title_hits;
        term_hits.insert(term.clone(), (body_hits + title_hits) as u32);
    }

    let term_count = query.terms().len().max(1) as f64;
    let coverage = covered as f64 / term_count;
    let density_budget = (text.chars().count() as f64 / DENSITY_WINDOW).max(1.0);
    let density = (body_total as f64 / density_budget).min(1.0);
    let title_boost = (title_total as f64 / term_count).min(1.0);

    let relevance = (0.5 * coverage + 0.3 * density + 0.2 * title_boost).clamp(0.0, 1.0);

    ScoredPage {
        page,
        relevance,
        term_hits,
    }
}

/// The ranking contract for key findings and every other ordered output
///
/// Ties on relevance break by level ascending (Level-1 before Level-2), then
/// by origin rank ascending, then by URL lexicographically.
pub fn ranking_cmp(a: &ScoredPage, b: &ScoredPage) -> Ordering {
    b.relevance
        .total_cmp(&a.relevance)
        .then_with(|| a.page.level.cmp(&b.page.level))
        .then_with(|| a.page.origin_rank.cmp(&b.page.origin_rank))
        .then_with(|| a.page.url.cmp(&b.page.url))
}

/// Non-overlapping substring occurrence count
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
