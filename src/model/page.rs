//! Pipeline data types: search hits, crawl tasks, fetch outcomes, and pages

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single result from the search provider
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Result URL as returned by the provider
    pub url: String,

    /// Result title
    pub title: String,

    /// Short text snippet shown alongside the result
    pub snippet: String,

    /// Origin order from the provider (1-based)
    pub rank: usize,
}

/// A unit of crawl work, produced by the planner and consumed by the fetcher
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// Normalized absolute URL to fetch
    pub url: String,

    /// BFS depth: 1 for search hits, 2 for pages linked from them
    pub level: u8,

    /// URL of the Level-1 page this task was discovered on (Level-2 only)
    pub parent_url: Option<String>,

    /// Index of the originating search hit; inherited by Level-2 tasks
    pub origin_rank: usize,

    /// Snippet from the originating search hit, if any
    pub origin_snippet: Option<String>,
}

/// Terminal status of a fetch (or extraction) attempt
///
/// `Extract` is never produced by the fetcher itself; it marks pages that
/// fetched successfully but could not be turned into a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStatus {
    /// Body retrieved and usable
    Ok,

    /// Server answered with a non-success status code
    HttpError,

    /// The request exceeded the per-request timeout
    Timeout,

    /// Connection-level failure (DNS, refused, TLS, reset)
    NetworkError,

    /// Body continued past the configured byte limit
    TooLarge,

    /// Content-Type is not HTML
    UnsupportedType,

    /// Never attempted or cancelled (deadline)
    Skipped,

    /// Fetched but the body could not be extracted
    Extract,
}

impl FetchStatus {
    /// Returns true for the one successful status
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::HttpError => "http-error",
            Self::Timeout => "timeout",
            Self::NetworkError => "network-error",
            Self::TooLarge => "too-large",
            Self::UnsupportedType => "unsupported-type",
            Self::Skipped => "skipped",
            Self::Extract => "extract",
        };
        write!(f, "{}", name)
    }
}

/// Fine-grained failure classification recorded per URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "timeout")]
    Timeout,

    #[serde(rename = "network")]
    Network,

    #[serde(rename = "http-4xx")]
    Http4xx,

    #[serde(rename = "http-5xx")]
    Http5xx,

    #[serde(rename = "unsupported-type")]
    UnsupportedType,

    #[serde(rename = "too-large")]
    TooLarge,

    #[serde(rename = "deadline")]
    Deadline,

    #[serde(rename = "extract")]
    Extract,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Http4xx => "http-4xx",
            Self::Http5xx => "http-5xx",
            Self::UnsupportedType => "unsupported-type",
            Self::TooLarge => "too-large",
            Self::Deadline => "deadline",
            Self::Extract => "extract",
        };
        write!(f, "{}", name)
    }
}

/// Result of a single attempted fetch
///
/// The fetcher never raises; every attempt ends in exactly one outcome.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The task URL that was fetched
    pub url: String,

    /// Final URL after redirects (equals `url` when no redirect occurred)
    pub final_url: String,

    /// Terminal status of the attempt
    pub status: FetchStatus,

    /// HTTP status code, when a response was received
    pub http_code: Option<u16>,

    /// Response body, non-empty only for `Ok` outcomes
    pub body: Vec<u8>,

    /// Content-Type header value, when present
    pub content_type: Option<String>,

    /// Wall-clock time spent on the attempt, including retries
    pub elapsed_ms: u64,

    /// Failure classification for non-`Ok` outcomes
    pub error_kind: Option<ErrorKind>,
}

impl FetchOutcome {
    /// Builds a failure outcome with an empty body
    pub fn failure(
        url: &str,
        status: FetchStatus,
        kind: ErrorKind,
        http_code: Option<u16>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            status,
            http_code,
            body: Vec::new(),
            content_type: None,
            elapsed_ms,
            error_kind: Some(kind),
        }
    }
}

/// An outgoing link extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlink {
    /// Normalized absolute target URL
    pub url: String,

    /// Collapsed anchor text of the link
    pub anchor: String,
}

/// A successfully fetched and extracted page
///
/// Pages are produced once and never mutated after entering the result.
#[derive(Debug, Clone)]
pub struct Page {
    /// Normalized absolute URL (the task URL, not the post-redirect URL)
    pub url: String,

    /// BFS depth of this page
    pub level: u8,

    /// Parent Level-1 URL for Level-2 pages
    pub parent_url: Option<String>,

    /// Index of the originating search hit
    pub origin_rank: usize,

    /// Snippet from the originating search hit, if any
    pub origin_snippet: Option<String>,

    /// Document title, empty when the page has none
    pub title: String,

    /// Visible text with boilerplate stripped and whitespace collapsed
    pub text: String,

    /// Deduplicated, normalized outgoing links
    pub outlinks: Vec<Outlink>,

    /// Time the fetch took
    pub fetch_elapsed_ms: u64,
}

/// A page with its computed relevance
#[derive(Debug, Clone)]
pub struct ScoredPage {
    pub page: Page,

    /// Lexical relevance in `[0.0, 1.0]`
    pub relevance: f64,

    /// Per-term occurrence counts (body + title)
    pub term_hits: BTreeMap<String, u32>,
}

/// A recorded per-URL failure
///
/// Failures never abort the run; they accumulate in the result.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub url: String,
    pub level: u8,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
    pub error_kind: ErrorKind,
}

impl Failure {
    /// Records a failed fetch outcome for a task
    pub fn from_outcome(task: &CrawlTask, outcome: &FetchOutcome) -> Self {
        Self {
            url: task.url.clone(),
            level: task.level,
            status: outcome.status,
            http_code: outcome.http_code,
            error_kind: outcome.error_kind.unwrap_or(ErrorKind::Network),
        }
    }

    /// Records an extraction failure after a successful fetch
    pub fn extract(task: &CrawlTask, http_code: Option<u16>) -> Self {
        Self {
            url: task.url.clone(),
            level: task.level,
            status: FetchStatus::Extract,
            http_code,
            error_kind: ErrorKind::Extract,
        }
    }
}
