//! Result synthesis: summary, key findings, and assembly
//!
//! The synthesizer post-processes the scored pages into a bounded summary
//! paragraph and a ranked list of key findings, then fills in the run
//! statistics. Its output order is fully determined by the scorer's ranking
//! contract, so the result is deterministic given identical fetch outcomes.

use crate::crawler::scorer::ranking_cmp;
use crate::model::{Failure, Query, ResearchResult, ScoredPage, SearchHit};
use crate::url::registrable_domain;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Pages contributing sentence windows to the summary
const SUMMARY_TOP_PAGES: usize = 5;

/// Sentences taken per contributing page
const SUMMARY_SENTENCES_PER_PAGE: usize = 3;

/// Character budget for the summary body after the lead sentence
const SUMMARY_MAX_CHARS: usize = 1500;

/// Maximum number of key-findings bullets
const KEY_FINDINGS_MAX: usize = 10;

/// Everything the synthesizer needs from a finished crawl
pub struct SynthesisInput {
    pub query: Query,
    pub initial_hits: Vec<SearchHit>,
    pub level1: Vec<ScoredPage>,
    pub level2: Vec<ScoredPage>,
    pub failures: Vec<Failure>,
    pub total_links_discovered: usize,
    pub search_failed: bool,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// The single entry in `key_findings` when the search stage produced nothing
pub fn search_failure_note(query: &str) -> String {
    format!(
        "search-failure: the search provider returned no results for '{}'",
        query
    )
}

/// Assembles the final research result from the collected pages
pub fn assemble(input: SynthesisInput) -> ResearchResult {
    let SynthesisInput {
        query,
        initial_hits,
        mut level1,
        mut level2,
        failures,
        total_links_discovered,
        search_failed,
        started_at,
        elapsed,
    } = input;

    level1.sort_by(ranking_cmp);
    level2.sort_by(ranking_cmp);

    let total_pages = level1.len() + level2.len();

    let (summary, key_findings) = {
        let mut ranked: Vec<&ScoredPage> = level1.iter().chain(level2.iter()).collect();
        ranked.sort_by(|a, b| ranking_cmp(a, b));

        let domains = distinct_domains(&ranked);
        let summary = if total_pages == 0 {
            String::new()
        } else {
            build_summary(&query, &ranked, total_pages, domains.len())
        };
        let key_findings = if search_failed {
            vec![search_failure_note(query.raw())]
        } else {
            build_key_findings(&query, &ranked)
        };
        (summary, key_findings)
    };

    ResearchResult {
        query: query.raw().to_string(),
        started_at,
        finished_at: Utc::now(),
        elapsed_seconds: elapsed.as_secs_f64(),
        initial_hits,
        level1_pages: level1,
        level2_pages: level2,
        summary,
        key_findings,
        total_pages_crawled: total_pages,
        total_links_discovered,
        failures,
    }
}

/// Distinct registrable domains across the crawled pages
fn distinct_domains(ranked: &[&ScoredPage]) -> HashSet<String> {
    ranked
        .iter()
        .filter_map(|page| {
            Url::parse(&page.page.url)
                .ok()
                .and_then(|url| url.host_str().map(|h| registrable_domain(h)))
        })
        .collect()
}

/// Builds the summary paragraph: one lead sentence, then sentence windows
/// from the top pages
///
/// Each window is the first few sentences of a page that mention a query
/// term. Sentences are deduplicated case-insensitively and the window text is
/// capped at roughly 1,500 characters.
fn build_summary(query: &Query, ranked: &[&ScoredPage], total_pages: usize, domain_count: usize) -> String {
    let mut summary = format!(
        "Research on '{}' surveyed {} pages across {} domains.",
        query.raw(),
        total_pages,
        domain_count
    );

    let mut seen_sentences: HashSet<String> = HashSet::new();
    let mut body_chars = 0usize;

    'pages: for page in ranked.iter().take(SUMMARY_TOP_PAGES) {
        let mut taken = 0usize;
        for sentence in split_sentences(&page.page.text) {
            if taken >= SUMMARY_SENTENCES_PER_PAGE {
                break;
            }
            let lowered = sentence.to_lowercase();
            if !query.matches(&lowered) {
                continue;
            }
            if !seen_sentences.insert(lowered) {
                continue;
            }
            if body_chars + sentence.len() > SUMMARY_MAX_CHARS {
                break 'pages;
            }
            summary.push(' ');
            summary.push_str(sentence);
            summary.push('.');
            body_chars += sentence.len();
            taken += 1;
        }
    }

    summary
}

/// Builds the ranked key-findings bullets
///
/// One bullet per page in ranking order, deduplicated by host, skipping
/// pages with empty text, up to the findings cap.
fn build_key_findings(query: &Query, ranked: &[&ScoredPage]) -> Vec<String> {
    let mut findings = Vec::new();
    let mut seen_hosts: HashSet<String> = HashSet::new();

    for page in ranked {
        if findings.len() >= KEY_FINDINGS_MAX {
            break;
        }
        if page.page.text.is_empty() {
            continue;
        }
        let host = match Url::parse(&page.page.url).ok().and_then(|u| u.host_str().map(String::from)) {
            Some(host) => host,
            None => continue,
        };
        if !seen_hosts.insert(host.clone()) {
            continue;
        }

        let label = if page.page.title.is_empty() {
            host
        } else {
            page.page.title.clone()
        };
        let excerpt = finding_excerpt(query, page);

        findings.push(format!("{} — {} ({})", label, excerpt, page.page.url));
    }

    findings
}

/// Picks the sentence shown in a finding: the first sentence mentioning a
/// query term, the origin search snippet, or the first sentence, in that
/// order of preference
fn finding_excerpt(query: &Query, page: &ScoredPage) -> String {
    let sentences = split_sentences(&page.page.text);

    for sentence in &sentences {
        if query.matches(&sentence.to_lowercase()) {
            return sentence.to_string();
        }
    }

    if let Some(snippet) = &page.page.origin_snippet {
        if !snippet.is_empty() {
            return snippet.clone();
        }
    }

    sentences.first().map(|s| s.to_string()).unwrap_or_default()
}

/// Splits text into trimmed sentences on terminal punctuation
fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::scorer::score_page;
    use crate::model::Page;

    fn scored(url: &str, level: u8, rank: usize, title: &str, text: &str, query: &Query) -> ScoredPage {
        score_page(
            Page {
                url: url.to_string(),
                level,
                parent_url: None,
                origin_rank: rank,
                origin_snippet: None,
                title: title.to_string(),
                text: text.to_string(),
                outlinks: Vec::new(),
                fetch_elapsed_ms: 0,
            },
            query,
        )
    }

    fn input(query: &str, level1: Vec<ScoredPage>, level2: Vec<ScoredPage>) -> SynthesisInput {
        SynthesisInput {
            query: Query::new(query),
            initial_hits: Vec::new(),
            level1,
            level2,
            failures: Vec::new(),
            total_links_discovered: 0,
            search_failed: false,
            started_at: Utc::now(),
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_empty_run_has_empty_summary() {
        let result = assemble(input("quantum", Vec::new(), Vec::new()));
        assert_eq!(result.summary, "");
        assert!(result.key_findings.is_empty());
        assert_eq!(result.total_pages_crawled, 0);
    }

    #[test]
    fn test_search_failure_note_in_findings() {
        let mut failed = input("quantum", Vec::new(), Vec::new());
        failed.search_failed = true;
        let result = assemble(failed);
        assert_eq!(result.key_findings.len(), 1);
        assert!(result.key_findings[0].contains("search-failure"));
        assert!(result.key_findings[0].contains("quantum"));
        assert_eq!(result.summary, "");
    }

    #[test]
    fn test_summary_lead_sentence() {
        let query = Query::new("quantum");
        let pages = vec![
            scored("http://a.example/1", 1, 0, "A", "quantum research is active", &query),
            scored("http://b.example/2", 1, 1, "B", "more quantum text here", &query),
        ];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert!(result
            .summary
            .starts_with("Research on 'quantum' surveyed 2 pages across 2 domains."));
    }

    #[test]
    fn test_summary_counts_registrable_domains_once() {
        let query = Query::new("quantum");
        let pages = vec![
            scored("http://www.a.example/1", 1, 0, "", "quantum one", &query),
            scored("http://blog.a.example/2", 1, 1, "", "quantum two", &query),
        ];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert!(result.summary.contains("across 1 domains"));
    }

    #[test]
    fn test_summary_includes_term_sentences_only() {
        let query = Query::new("quantum");
        let pages = vec![scored(
            "http://a.example/1",
            1,
            0,
            "",
            "Unrelated filler sentence. Quantum computers are improving. Another filler.",
            &query,
        )];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert!(result.summary.contains("Quantum computers are improving."));
        assert!(!result.summary.contains("Unrelated filler"));
    }

    #[test]
    fn test_summary_deduplicates_sentences_case_insensitively() {
        let query = Query::new("quantum");
        let pages = vec![
            scored("http://a.example/1", 1, 0, "", "Quantum state of the art.", &query),
            scored("http://b.example/2", 1, 1, "", "QUANTUM STATE OF THE ART.", &query),
        ];
        let result = assemble(input("quantum", pages, Vec::new()));
        let occurrences = result.summary.to_lowercase().matches("quantum state of the art").count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn test_summary_bounded_length() {
        let query = Query::new("quantum");
        let long_text = "quantum findings accumulate in this sentence. ".repeat(200);
        let pages = vec![scored("http://a.example/1", 1, 0, "", &long_text, &query)];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert!(result.summary.len() < 1700);
    }

    #[test]
    fn test_key_findings_format() {
        let query = Query::new("quantum");
        let pages = vec![scored(
            "http://a.example/p1",
            1,
            0,
            "Alpha",
            "Quantum breakthroughs happened this year",
            &query,
        )];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert_eq!(result.key_findings.len(), 1);
        assert!(result.key_findings[0].starts_with("Alpha — "));
        assert!(result.key_findings[0].contains("Quantum breakthroughs"));
        assert!(result.key_findings[0].ends_with("(http://a.example/p1)"));
    }

    #[test]
    fn test_key_findings_fall_back_to_host_label() {
        let query = Query::new("quantum");
        let pages = vec![scored("http://a.example/p1", 1, 0, "", "quantum text", &query)];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert!(result.key_findings[0].starts_with("a.example — "));
    }

    #[test]
    fn test_key_findings_deduplicate_by_host() {
        let query = Query::new("quantum");
        let pages = vec![
            scored("http://a.example/p1", 1, 0, "One", "quantum alpha", &query),
            scored("http://a.example/p2", 1, 1, "Two", "quantum beta", &query),
            scored("http://b.example/p3", 1, 2, "Three", "quantum gamma", &query),
        ];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert_eq!(result.key_findings.len(), 2);
    }

    #[test]
    fn test_key_findings_skip_empty_pages() {
        let query = Query::new("quantum");
        let pages = vec![
            scored("http://a.example/p1", 1, 0, "Empty", "", &query),
            scored("http://b.example/p2", 1, 1, "Full", "quantum content", &query),
        ];
        let result = assemble(input("quantum", pages, Vec::new()));
        assert_eq!(result.key_findings.len(), 1);
        assert!(result.key_findings[0].starts_with("Full"));
    }

    #[test]
    fn test_key_findings_ordered_by_ranking() {
        let query = Query::new("quantum");
        let filler = "neutral page content repeated for length purposes. ".repeat(30);
        let strong = scored(
            "http://strong.example/",
            1,
            1,
            "Strong",
            &format!("quantum quantum quantum quantum {}", filler),
            &query,
        );
        let weak = scored(
            "http://weak.example/",
            1,
            0,
            "Weak",
            &format!("quantum {}", filler),
            &query,
        );
        assert!(strong.relevance > weak.relevance);
        let result = assemble(input("quantum", vec![weak, strong], Vec::new()));
        assert!(result.key_findings[0].starts_with("Strong"));
        assert!(result.key_findings[1].starts_with("Weak"));
    }

    #[test]
    fn test_page_lists_sorted_by_ranking() {
        let query = Query::new("quantum");
        let filler = "neutral page content repeated for length purposes. ".repeat(30);
        let a = scored("http://a.example/", 1, 1, "", &format!("quantum quantum quantum {}", filler), &query);
        let b = scored("http://b.example/", 1, 0, "", &format!("quantum {}", filler), &query);
        let result = assemble(input("quantum", vec![b, a], Vec::new()));
        assert_eq!(result.level1_pages[0].page.url, "http://a.example/");
    }

    #[test]
    fn test_totals_are_consistent() {
        let query = Query::new("quantum");
        let l1 = vec![scored("http://a.example/", 1, 0, "", "quantum", &query)];
        let l2 = vec![
            scored("http://b.example/", 2, 0, "", "quantum", &query),
            scored("http://c.example/", 2, 0, "", "quantum", &query),
        ];
        let result = assemble(input("quantum", l1, l2));
        assert_eq!(result.total_pages_crawled, 3);
        assert_eq!(
            result.total_pages_crawled,
            result.level1_pages.len() + result.level2_pages.len()
        );
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("One sentence. Two! Three? Four");
        assert_eq!(sentences, vec!["One sentence", "Two", "Three", "Four"]);
    }

    #[test]
    fn test_split_sentences_empty_text() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("...").is_empty());
    }
}
