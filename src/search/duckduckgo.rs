//! DuckDuckGo search provider
//!
//! Queries the public `html.duckduckgo.com/html` endpoint and parses the
//! result list out of the returned markup. Result links arrive as
//! `duckduckgo.com/l/?uddg=<encoded>` redirects, which are unwrapped to the
//! destination URL before being handed to the planner.

use crate::model::SearchHit;
use crate::search::{SearchError, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Search provider backed by DuckDuckGo's HTML endpoint
pub struct DuckDuckGoProvider {
    client: Client,
}

impl DuckDuckGoProvider {
    /// Builds a provider with its own HTTP client
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}?q={}", SEARCH_ENDPOINT, urlencoding::encode(query));
        tracing::debug!(query, "querying DuckDuckGo");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Http(format!(
                "search endpoint returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        let hits = parse_results(&body, limit);
        tracing::info!(count = hits.len(), "search returned results");
        Ok(hits)
    }
}

/// Parses search hits out of the result page markup
fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    let result_selector = match Selector::parse(".result") {
        Ok(s) => s,
        Err(_) => return hits,
    };
    let link_selector = match Selector::parse(".result__a") {
        Ok(s) => s,
        Err(_) => return hits,
    };
    let snippet_selector = match Selector::parse(".result__snippet") {
        Ok(s) => s,
        Err(_) => return hits,
    };

    for result in document.select(&result_selector) {
        if hits.len() >= limit {
            break;
        }

        let Some(link) = result.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = clean_result_url(href) else {
            continue;
        };

        let title = collapse(&link.text().collect::<String>());
        if title.is_empty() {
            continue;
        }

        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(|el| collapse(&el.text().collect::<String>()))
            .unwrap_or_default();

        hits.push(SearchHit {
            url,
            title,
            snippet,
            rank: hits.len() + 1,
        });
    }

    hits
}

/// Unwraps DuckDuckGo's `uddg=` redirect wrapper, passing direct URLs through
fn clean_result_url(href: &str) -> Option<String> {
    if let Some(position) = href.find("uddg=") {
        let encoded = &href[position + 5..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        return urlencoding::decode(encoded).ok().map(|s| s.into_owned());
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    None
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
