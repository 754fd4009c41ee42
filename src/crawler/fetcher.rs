//! Concurrent HTTP fetch engine
//!
//! This module handles all page retrieval for the crawler, including:
//! - The `HttpTransport` seam over the actual HTTP client
//! - Global concurrency capping via a semaphore
//! - Per-host serialization and minimum request spacing
//! - Retry logic with exponential backoff for transient failures
//! - Content-type filtering and body-size enforcement
//! - Overall-deadline cancellation at the I/O boundary
//!
//! The fetcher never raises: every attempted task ends in exactly one
//! [`FetchOutcome`].

use crate::config::ResearchConfig;
use crate::model::{CrawlTask, ErrorKind, FetchOutcome, FetchStatus};
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, Semaphore};
use tokio::time::Instant;
use url::Url;

/// Maximum redirect hops followed per request
pub const MAX_REDIRECTS: usize = 5;

/// Connection establishment timeout, separate from the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport-level failures, before any HTTP semantics apply
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

/// A raw HTTP response as seen by the fetcher
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// URL after following redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, when present
    pub content_type: Option<String>,

    /// Response body, read up to the configured byte limit
    pub body: Vec<u8>,

    /// True when the body continued past the byte limit
    pub truncated: bool,
}

/// The `{fetch}` capability: one GET, redirects resolved, body bounded
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by reqwest
pub struct ReqwestTransport {
    client: Client,
    max_bytes: usize,
}

impl ReqwestTransport {
    /// Builds the transport and its HTTP client from the configuration
    pub fn new(config: &ResearchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_sec))
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes_per_page,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let room = self.max_bytes.saturating_sub(body.len());
                    if chunk.len() > room {
                        body.extend_from_slice(&chunk[..room]);
                        truncated = true;
                        break;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => return Err(classify_reqwest_error(e)),
            }
        }

        Ok(HttpResponse {
            final_url,
            status,
            content_type,
            body,
            truncated,
        })
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}

/// Retry policy for transient failures
///
/// Timeouts and network errors retry up to `max_retries`; HTTP 5xx retries
/// once; HTTP 4xx never retries.
#[derive(Debug, Clone)]
struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Exponential backoff: base * 2^attempt (0.5s, 1s, 2s, ...)
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    fn server_error_retries(&self) -> u32 {
        self.max_retries.min(1)
    }
}

/// Per-host politeness state
struct HostState {
    last_start: Option<Instant>,
}

/// The concurrent fetch engine
///
/// Holds the global concurrency semaphore and per-host timestamps. A host's
/// mutex is held for the duration of a fetch, so at most one request per host
/// is ever in flight, and consecutive request starts to the same host are
/// spaced by at least the configured interval.
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    permits: Arc<Semaphore>,
    hosts: Mutex<HashMap<String, Arc<AsyncMutex<HostState>>>>,
    min_interval: Duration,
    retry: RetryPolicy,
}

impl Fetcher {
    /// Creates a fetcher over the given transport
    pub fn new(transport: Arc<dyn HttpTransport>, config: &ResearchConfig) -> Self {
        Self {
            transport,
            permits: Arc::new(Semaphore::new(config.max_concurrency)),
            hosts: Mutex::new(HashMap::new()),
            min_interval: Duration::from_millis(config.per_host_min_interval_ms),
            retry: RetryPolicy::new(config.max_retries),
        }
    }

    /// Fetches a task, returning a terminal outcome in every case
    ///
    /// Tasks that have not started when the deadline fires, and in-flight
    /// requests cancelled at their next I/O boundary, report a `Skipped`
    /// outcome with kind `deadline`.
    pub async fn fetch(&self, task: &CrawlTask, deadline: Instant) -> FetchOutcome {
        let started = std::time::Instant::now();

        if Instant::now() >= deadline {
            return FetchOutcome::failure(
                &task.url,
                FetchStatus::Skipped,
                ErrorKind::Deadline,
                None,
                0,
            );
        }

        match tokio::time::timeout_at(deadline, self.fetch_inner(&task.url)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::debug!(url = %task.url, "fetch cancelled by overall deadline");
                FetchOutcome::failure(
                    &task.url,
                    FetchStatus::Skipped,
                    ErrorKind::Deadline,
                    None,
                    started.elapsed().as_millis() as u64,
                )
            }
        }
    }

    async fn fetch_inner(&self, url: &str) -> FetchOutcome {
        let started = std::time::Instant::now();

        let _permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                return FetchOutcome::failure(
                    url,
                    FetchStatus::NetworkError,
                    ErrorKind::Network,
                    None,
                    started.elapsed().as_millis() as u64,
                );
            }
        };

        let host_lock = self.host_entry(url);
        let mut host = host_lock.lock().await;

        let mut attempt: u32 = 0;
        loop {
            self.wait_for_host_slot(&mut host).await;

            match self.transport.get(url).await {
                Ok(response) => {
                    let is_server_error = (500..600).contains(&response.status);
                    if is_server_error && attempt < self.retry.server_error_retries() {
                        tracing::debug!(
                            url,
                            status = response.status,
                            attempt,
                            "retrying after server error"
                        );
                        tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return classify_response(url, response, started);
                }
                Err(TransportError::Timeout) => {
                    if attempt < self.retry.max_retries {
                        tracing::debug!(url, attempt, "retrying after timeout");
                        tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return FetchOutcome::failure(
                        url,
                        FetchStatus::Timeout,
                        ErrorKind::Timeout,
                        None,
                        started.elapsed().as_millis() as u64,
                    );
                }
                Err(TransportError::Network(message)) => {
                    if attempt < self.retry.max_retries {
                        tracing::debug!(url, attempt, error = %message, "retrying after network error");
                        tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    tracing::warn!(url, error = %message, "fetch failed after retries");
                    return FetchOutcome::failure(
                        url,
                        FetchStatus::NetworkError,
                        ErrorKind::Network,
                        None,
                        started.elapsed().as_millis() as u64,
                    );
                }
            }
        }
    }

    /// Sleeps until this host's minimum interval has elapsed, then claims a
    /// start slot
    async fn wait_for_host_slot(&self, host: &mut HostState) {
        if let Some(last) = host.last_start {
            let next_allowed = last + self.min_interval;
            if next_allowed > Instant::now() {
                tokio::time::sleep_until(next_allowed).await;
            }
        }
        host.last_start = Some(Instant::now());
    }

    fn host_entry(&self, url: &str) -> Arc<AsyncMutex<HostState>> {
        let key = host_key(url);
        let mut hosts = match self.hosts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        hosts
            .entry(key)
            .or_insert_with(|| Arc::new(AsyncMutex::new(HostState { last_start: None })))
            .clone()
    }
}

/// Politeness key: host plus explicit port, so servers on different ports
/// are treated as distinct hosts
fn host_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// Turns a received response into a terminal outcome
fn classify_response(url: &str, response: HttpResponse, started: std::time::Instant) -> FetchOutcome {
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if !(200..300).contains(&response.status) {
        let kind = if (500..600).contains(&response.status) {
            ErrorKind::Http5xx
        } else {
            ErrorKind::Http4xx
        };
        return FetchOutcome {
            url: url.to_string(),
            final_url: response.final_url,
            status: FetchStatus::HttpError,
            http_code: Some(response.status),
            body: Vec::new(),
            content_type: response.content_type,
            elapsed_ms,
            error_kind: Some(kind),
        };
    }

    if let Some(content_type) = &response.content_type {
        if !is_html_content_type(content_type) {
            return FetchOutcome {
                url: url.to_string(),
                final_url: response.final_url,
                status: FetchStatus::UnsupportedType,
                http_code: Some(response.status),
                body: Vec::new(),
                content_type: response.content_type,
                elapsed_ms,
                error_kind: Some(ErrorKind::UnsupportedType),
            };
        }
    }

    if response.truncated {
        return FetchOutcome {
            url: url.to_string(),
            final_url: response.final_url,
            status: FetchStatus::TooLarge,
            http_code: Some(response.status),
            body: Vec::new(),
            content_type: response.content_type,
            elapsed_ms,
            error_kind: Some(ErrorKind::TooLarge),
        };
    }

    FetchOutcome {
        url: url.to_string(),
        final_url: response.final_url,
        status: FetchStatus::Ok,
        http_code: Some(response.status),
        body: response.body,
        content_type: response.content_type,
        elapsed_ms,
        error_kind: None,
    }
}

/// Accepts `text/html` and `application/xhtml+xml`; an absent or empty
/// header is treated as HTML, since minimal servers omit it
fn is_html_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence.is_empty() || essence == "text/html" || essence == "application/xhtml+xml"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn task(url: &str) -> CrawlTask {
        CrawlTask {
            url: url.to_string(),
            level: 1,
            parent_url: None,
            origin_rank: 0,
            origin_snippet: None,
        }
    }

    fn config_with(max_concurrency: usize, interval_ms: u64, retries: u32) -> ResearchConfig {
        let mut config = ResearchConfig::default();
        config.max_concurrency = max_concurrency;
        config.per_host_min_interval_ms = interval_ms;
        config.max_retries = retries;
        config
    }

    fn html_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            final_url: "http://d.example/".to_string(),
            status,
            content_type: Some("text/html".to_string()),
            body: body.as_bytes().to_vec(),
            truncated: false,
        }
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(3600)
    }

    /// Transport that replays a scripted sequence of results and records
    /// per-call start times
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        starts: Mutex<Vec<(String, Instant)>>,
        calls: AtomicUsize,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                starts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn always_ok(delay: Duration) -> Self {
            let mut transport = Self::new(Vec::new());
            transport.delay = delay;
            transport
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.starts
                .lock()
                .unwrap()
                .push((url.to_string(), Instant::now()));

            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let scripted = self.script.lock().unwrap().pop_front();
            match scripted {
                Some(result) => result,
                None => Ok(html_response(200, "<html><body>ok</body></html>")),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_fetch() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(html_response(
            200,
            "<html><body>hello</body></html>",
        ))]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::Ok);
        assert_eq!(outcome.http_code, Some(200));
        assert!(!outcome.body.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_4xx_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(html_response(404, ""))]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/missing"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::HttpError);
        assert_eq!(outcome.http_code, Some(404));
        assert_eq!(outcome.error_kind, Some(ErrorKind::Http4xx));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_5xx_is_retried_once() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(html_response(500, "")),
            Ok(html_response(500, "")),
            Ok(html_response(500, "")),
        ]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/flaky"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::HttpError);
        assert_eq!(outcome.error_kind, Some(ErrorKind::Http5xx));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_5xx_recovers_on_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(html_response(503, "")),
            Ok(html_response(200, "<html><body>recovered</body></html>")),
        ]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/flaky"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::Ok);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_retries_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportError::Timeout),
            Ok(html_response(200, "<html><body>late</body></html>")),
        ]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/slow"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::Ok);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_exhausts_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportError::Timeout),
            Err(TransportError::Timeout),
            Err(TransportError::Timeout),
        ]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/dead"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::Timeout);
        assert_eq!(outcome.error_kind, Some(ErrorKind::Timeout));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_exhausts_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportError::Network("connection refused".to_string())),
            Err(TransportError::Network("connection refused".to_string())),
            Err(TransportError::Network("connection refused".to_string())),
        ]));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/gone"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::NetworkError);
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_content_type() {
        let mut response = html_response(200, "binary");
        response.content_type = Some("application/pdf".to_string());
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(response)]));
        let fetcher = Fetcher::new(transport, &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/file.pdf"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::UnsupportedType);
        assert_eq!(outcome.error_kind, Some(ErrorKind::UnsupportedType));
        assert!(outcome.body.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_truncated_body_is_too_large() {
        let mut response = html_response(200, "partial");
        response.truncated = true;
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(response)]));
        let fetcher = Fetcher::new(transport, &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/huge"), far_deadline()).await;
        assert_eq!(outcome.status, FetchStatus::TooLarge);
        assert_eq!(outcome.error_kind, Some(ErrorKind::TooLarge));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_skips_without_transport_call() {
        let transport = Arc::new(ScriptedTransport::new(Vec::new()));
        let fetcher = Fetcher::new(transport.clone(), &config_with(4, 0, 2));

        let outcome = fetcher.fetch(&task("http://d.example/"), Instant::now()).await;
        assert_eq!(outcome.status, FetchStatus::Skipped);
        assert_eq!(outcome.error_kind, Some(ErrorKind::Deadline));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels_in_flight_fetch() {
        let transport = Arc::new(ScriptedTransport::always_ok(Duration::from_secs(10)));
        let fetcher = Fetcher::new(transport, &config_with(4, 0, 0));

        let deadline = Instant::now() + Duration::from_secs(2);
        let outcome = fetcher.fetch(&task("http://d.example/slow"), deadline).await;
        assert_eq!(outcome.status, FetchStatus::Skipped);
        assert_eq!(outcome.error_kind, Some(ErrorKind::Deadline));
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_host_spacing_enforced() {
        let transport = Arc::new(ScriptedTransport::always_ok(Duration::ZERO));
        let fetcher = Arc::new(Fetcher::new(transport.clone(), &config_with(8, 1000, 0)));

        let mut handles = Vec::new();
        for i in 0..5 {
            let fetcher = fetcher.clone();
            handles.push(tokio::spawn(async move {
                fetcher
                    .fetch(&task(&format!("http://d.example/p{}", i)), far_deadline())
                    .await
            }));
        }
        for handle in handles {
            let outcome = handle.await.unwrap();
            assert_eq!(outcome.status, FetchStatus::Ok);
        }

        let starts = transport.starts.lock().unwrap();
        assert_eq!(starts.len(), 5);
        let mut times: Vec<Instant> = starts.iter().map(|(_, t)| *t).collect();
        times.sort();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
        }
        assert!(times[4] - times[0] >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_hosts_are_not_spaced() {
        let transport = Arc::new(ScriptedTransport::always_ok(Duration::ZERO));
        let fetcher = Arc::new(Fetcher::new(transport.clone(), &config_with(8, 1000, 0)));

        let start = Instant::now();
        let mut handles = Vec::new();
        for i in 0..4 {
            let fetcher = fetcher.clone();
            handles.push(tokio::spawn(async move {
                fetcher
                    .fetch(&task(&format!("http://host{}.example/", i)), far_deadline())
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Different hosts never wait on one another
        assert!(Instant::now() - start < Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_concurrency_cap() {
        let transport = Arc::new(ScriptedTransport::always_ok(Duration::from_millis(50)));
        let fetcher = Arc::new(Fetcher::new(transport.clone(), &config_with(4, 0, 0)));

        let mut handles = Vec::new();
        for i in 0..20 {
            let fetcher = fetcher.clone();
            handles.push(tokio::spawn(async move {
                fetcher
                    .fetch(&task(&format!("http://host{}.example/", i)), far_deadline())
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(transport.call_count(), 20);
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 4);
    }

    #[test]
    fn test_retry_policy_backoff_doubles() {
        let policy = RetryPolicy::new(2);
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_is_html_content_type() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(is_html_content_type(""));
        assert!(!is_html_content_type("application/pdf"));
        assert!(!is_html_content_type("image/png"));
        assert!(!is_html_content_type("application/json"));
    }

    #[test]
    fn test_host_key_includes_port() {
        assert_eq!(host_key("http://example.com/a"), "example.com");
        assert_eq!(host_key("http://example.com:8080/a"), "example.com:8080");
        assert_ne!(
            host_key("http://127.0.0.1:7001/"),
            host_key("http://127.0.0.1:7002/")
        );
    }
}
