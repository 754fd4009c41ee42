use serde::Deserialize;

/// Main configuration structure for Kumo-Research
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub research: ResearchConfig,
    pub output: OutputConfig,
}

/// Research pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResearchConfig {
    /// Hard cap on Level-1 tasks admitted from search
    pub max_initial_results: usize,

    /// Per-parent cap on Level-2 admissions
    pub max_level2_per_page: usize,

    /// Optional global cap on pages attempted across both levels
    pub max_total_pages: Option<usize>,

    /// Per-request deadline in seconds
    pub request_timeout_sec: u64,

    /// Whole-run deadline in seconds; 0 ends the run before any fetch
    pub overall_deadline_sec: u64,

    /// Maximum simultaneous fetches
    pub max_concurrency: usize,

    /// Minimum spacing between fetch starts to the same host (milliseconds)
    pub per_host_min_interval_ms: u64,

    /// Per-task retries on transient failures
    pub max_retries: u32,

    /// Body truncation limit in bytes
    pub max_bytes_per_page: usize,

    /// Extracted-text truncation limit in characters
    pub max_content_length: usize,

    /// HTTP User-Agent identifying the tool
    pub user_agent: String,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_initial_results: 20,
            max_level2_per_page: 10,
            max_total_pages: None,
            request_timeout_sec: 30,
            overall_deadline_sec: 120,
            max_concurrency: 10,
            per_host_min_interval_ms: 500,
            max_retries: 2,
            max_bytes_per_page: 1_000_000,
            max_content_length: 1_000_000,
            user_agent: concat!(
                "kumo-research/",
                env!("CARGO_PKG_VERSION"),
                " (+https://github.com/kumo-research/kumo-research)"
            )
            .to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory where result artifacts are written
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "research_output".to_string(),
        }
    }
}
