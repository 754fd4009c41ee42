//! Two-level BFS planner
//!
//! The planner owns the frontier and the visited set. It issues the initial
//! search, admits Level-1 tasks in hit order, expands Level-2 tasks from each
//! Level-1 page's outlinks as that page completes, and folds every terminal
//! outcome into the final result. Workers fetch, extract, and score; all
//! frontier and visited-set mutation happens serially on the planner's own
//! task.
//!
//! Individual fetch or extraction failures never abort the run. The only
//! condition raised to the caller is a configuration error, checked before
//! the planner is built.

use crate::config::ResearchConfig;
use crate::crawler::fetcher::{Fetcher, HttpTransport};
use crate::crawler::synthesizer::{self, SynthesisInput};
use crate::crawler::{extractor, scorer};
use crate::model::{CrawlTask, Failure, Outlink, Query, ResearchResult, ScoredPage};
use crate::search::SearchProvider;
use crate::url::{normalize_url, registrable_domain_of};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

/// Terminal output of one crawl task
enum TaskOutput {
    Completed(Box<ScoredPage>),
    Failed(Failure),
}

/// Drives a single research run
pub struct Planner {
    config: ResearchConfig,
    query: Arc<Query>,
    provider: Arc<dyn SearchProvider>,
    fetcher: Arc<Fetcher>,
    visited: HashSet<String>,
    admitted: usize,
}

impl Planner {
    /// Builds a planner for one run
    pub fn new(
        config: ResearchConfig,
        query: &str,
        provider: Arc<dyn SearchProvider>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let fetcher = Arc::new(Fetcher::new(transport, &config));
        Self {
            query: Arc::new(Query::new(query)),
            provider,
            fetcher,
            visited: HashSet::new(),
            admitted: 0,
            config,
        }
    }

    /// Runs search, both crawl levels, and synthesis to completion
    pub async fn run(mut self) -> ResearchResult {
        let started_at = Utc::now();
        let run_timer = std::time::Instant::now();
        let deadline = Instant::now() + Duration::from_secs(self.config.overall_deadline_sec);

        tracing::info!(query = %self.query.raw(), "starting research run");

        // The deadline gates fetching only; the search call relies on the
        // provider's own timeout so that a zero deadline still enumerates
        // the Level-1 URLs it prevented from running.
        let mut hits = match self
            .provider
            .search(self.query.raw(), self.config.max_initial_results)
            .await
        {
            Ok(hits) => hits,
            Err(error) => {
                tracing::warn!(%error, "search provider failed");
                Vec::new()
            }
        };
        hits.truncate(self.config.max_initial_results);

        if hits.is_empty() {
            tracing::warn!("no search results; producing empty result");
            return synthesizer::assemble(SynthesisInput {
                query: (*self.query).clone(),
                initial_hits: hits,
                level1: Vec::new(),
                level2: Vec::new(),
                failures: Vec::new(),
                total_links_discovered: 0,
                search_failed: true,
                started_at,
                elapsed: run_timer.elapsed(),
            });
        }

        tracing::info!(hits = hits.len(), "admitting Level-1 tasks");

        let mut join_set: JoinSet<TaskOutput> = JoinSet::new();
        for (index, hit) in hits.iter().enumerate() {
            if self.at_page_cap() {
                tracing::debug!("page cap reached during Level-1 admission");
                break;
            }
            let normalized = match normalize_url(&hit.url) {
                Ok(url) => url.to_string(),
                Err(error) => {
                    tracing::debug!(url = %hit.url, %error, "skipping unusable search hit");
                    continue;
                }
            };
            if !self.visited.insert(normalized.clone()) {
                continue;
            }
            self.admitted += 1;
            self.spawn_task(
                &mut join_set,
                CrawlTask {
                    url: normalized,
                    level: 1,
                    parent_url: None,
                    origin_rank: index,
                    origin_snippet: Some(hit.snippet.clone()),
                },
                deadline,
            );
        }

        let mut level1 = Vec::new();
        let mut level2 = Vec::new();
        let mut failures = Vec::new();
        let mut total_links_discovered = 0usize;

        while let Some(joined) = join_set.join_next().await {
            let output = match joined {
                Ok(output) => output,
                Err(error) => {
                    tracing::warn!(%error, "crawl task aborted");
                    continue;
                }
            };

            match output {
                TaskOutput::Completed(scored) => {
                    if scored.page.level == 1 {
                        total_links_discovered += scored.page.outlinks.len();
                        for child in self.select_level2(&scored) {
                            self.spawn_task(&mut join_set, child, deadline);
                        }
                        tracing::debug!(
                            url = %scored.page.url,
                            relevance = scored.relevance,
                            outlinks = scored.page.outlinks.len(),
                            "Level-1 page complete"
                        );
                        level1.push(*scored);
                    } else {
                        tracing::debug!(
                            url = %scored.page.url,
                            relevance = scored.relevance,
                            "Level-2 page complete"
                        );
                        level2.push(*scored);
                    }
                }
                TaskOutput::Failed(failure) => {
                    tracing::debug!(
                        url = %failure.url,
                        status = %failure.status,
                        kind = %failure.error_kind,
                        "task failed"
                    );
                    failures.push(failure);
                }
            }
        }

        tracing::info!(
            level1 = level1.len(),
            level2 = level2.len(),
            failures = failures.len(),
            "crawl complete; synthesizing"
        );

        synthesizer::assemble(SynthesisInput {
            query: (*self.query).clone(),
            initial_hits: hits,
            level1,
            level2,
            failures,
            total_links_discovered,
            search_failed: false,
            started_at,
            elapsed: run_timer.elapsed(),
        })
    }

    fn spawn_task(&self, join_set: &mut JoinSet<TaskOutput>, task: CrawlTask, deadline: Instant) {
        let fetcher = self.fetcher.clone();
        let query = self.query.clone();
        let max_text = self.config.max_content_length;
        join_set.spawn(run_task(fetcher, query, task, deadline, max_text));
    }

    fn at_page_cap(&self) -> bool {
        matches!(self.config.max_total_pages, Some(cap) if self.admitted >= cap)
    }

    /// Selects Level-2 tasks from a completed Level-1 page
    ///
    /// Candidates are filtered against the parent URL and the visited set,
    /// then preferred in order: cross-host links first, then links whose
    /// anchor text or path mentions a query term, then document order.
    /// Selected URLs enter the visited set at admission, so a URL is admitted
    /// at most once across the whole run.
    fn select_level2(&mut self, parent: &ScoredPage) -> Vec<CrawlTask> {
        if self.config.max_level2_per_page == 0 {
            return Vec::new();
        }

        let parent_domain = Url::parse(&parent.page.url)
            .ok()
            .and_then(|url| registrable_domain_of(&url));

        let mut candidates = rank_outlinks(
            &parent.page.outlinks,
            &parent.page.url,
            parent_domain.as_deref(),
            &self.query,
            &self.visited,
        );
        candidates.truncate(self.config.max_level2_per_page);

        let mut tasks = Vec::new();
        for url in candidates {
            if self.at_page_cap() {
                break;
            }
            if !self.visited.insert(url.clone()) {
                continue;
            }
            self.admitted += 1;
            tasks.push(CrawlTask {
                url,
                level: 2,
                parent_url: Some(parent.page.url.clone()),
                origin_rank: parent.page.origin_rank,
                origin_snippet: None,
            });
        }
        tasks
    }
}

/// Orders a page's outlinks by Level-2 preference and returns their URLs
fn rank_outlinks(
    outlinks: &[Outlink],
    parent_url: &str,
    parent_domain: Option<&str>,
    query: &Query,
    visited: &HashSet<String>,
) -> Vec<String> {
    struct Candidate<'a> {
        index: usize,
        url: &'a str,
        cross_host: bool,
        term_match: bool,
    }

    let mut candidates = Vec::new();
    for (index, link) in outlinks.iter().enumerate() {
        if link.url == parent_url || visited.contains(&link.url) {
            continue;
        }
        let Ok(parsed) = Url::parse(&link.url) else {
            continue;
        };

        let cross_host = match (parent_domain, registrable_domain_of(&parsed)) {
            (Some(parent), Some(child)) => parent != child,
            _ => false,
        };
        let haystack = format!(
            "{} {}",
            link.anchor.to_lowercase(),
            parsed.path().to_lowercase()
        );
        let term_match = query.matches(&haystack);

        candidates.push(Candidate {
            index,
            url: &link.url,
            cross_host,
            term_match,
        });
    }

    candidates.sort_by(|a, b| {
        b.cross_host
            .cmp(&a.cross_host)
            .then(b.term_match.cmp(&a.term_match))
            .then(a.index.cmp(&b.index))
    });

    candidates.into_iter().map(|c| c.url.to_string()).collect()
}

/// One worker: fetch, extract, score
async fn run_task(
    fetcher: Arc<Fetcher>,
    query: Arc<Query>,
    task: CrawlTask,
    deadline: Instant,
    max_text_chars: usize,
) -> TaskOutput {
    let outcome = fetcher.fetch(&task, deadline).await;

    if !outcome.status.is_ok() {
        return TaskOutput::Failed(Failure::from_outcome(&task, &outcome));
    }

    let body = String::from_utf8_lossy(&outcome.body);
    let base = match Url::parse(&outcome.final_url).or_else(|_| Url::parse(&task.url)) {
        Ok(base) => base,
        Err(error) => {
            tracing::debug!(url = %task.url, %error, "unusable base URL after fetch");
            return TaskOutput::Failed(Failure::extract(&task, outcome.http_code));
        }
    };

    match extractor::extract(&body, &base, max_text_chars) {
        Ok(extracted) => {
            let page = crate::model::Page {
                url: task.url.clone(),
                level: task.level,
                parent_url: task.parent_url.clone(),
                origin_rank: task.origin_rank,
                origin_snippet: task.origin_snippet.clone(),
                title: extracted.title,
                text: extracted.text,
                outlinks: extracted.outlinks,
                fetch_elapsed_ms: outcome.elapsed_ms,
            };
            TaskOutput::Completed(Box::new(scorer::score_page(page, &query)))
        }
        Err(error) => {
            tracing::debug!(url = %task.url, %error, "extraction failed");
            TaskOutput::Failed(Failure::extract(&task, outcome.http_code))
        }
    }
}
