//! Kumo-Research main entry point
//!
//! Command-line front end for the deep research crawler. Maps flags onto the
//! pipeline configuration, runs the research, and writes the JSON wire
//! document plus a markdown report into the output directory.

use chrono::Utc;
use clap::Parser;
use kumo_research::config::{load_config_with_hash, Config};
use kumo_research::crawler::{research, ReqwestTransport};
use kumo_research::output::{write_json, write_markdown_report};
use kumo_research::search::DuckDuckGoProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Kumo-Research: a deep research web crawler
///
/// Searches the web for a query, crawls the result set two levels deep,
/// scores each page for relevance, and distills a summary plus key findings
/// into a structured report.
#[derive(Parser, Debug)]
#[command(name = "kumo-research")]
#[command(version)]
#[command(about = "A deep research web crawler", long_about = None)]
struct Cli {
    /// The research query
    #[arg(value_name = "QUERY")]
    query: String,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cap on Level-1 pages admitted from search
    #[arg(long, value_name = "N")]
    max_results: Option<usize>,

    /// Per-parent cap on Level-2 links followed
    #[arg(long, value_name = "N")]
    max_links_per_page: Option<usize>,

    /// Global cap on pages attempted across both levels
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Whole-run deadline in seconds
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,

    /// Maximum simultaneous fetches
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Minimum spacing between fetches to the same host, in milliseconds
    #[arg(long, value_name = "MS")]
    host_interval_ms: Option<u64>,

    /// Retries per task on transient failures
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// HTTP User-Agent to send
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Directory for result artifacts
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would run without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
            config
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        handle_dry_run(&config, &cli.query);
        return Ok(());
    }

    handle_research(config, &cli.query).await
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo_research=info,warn"),
            1 => EnvFilter::new("kumo_research=debug,info"),
            2 => EnvFilter::new("kumo_research=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Maps CLI flags onto the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    let research = &mut config.research;
    if let Some(value) = cli.max_results {
        research.max_initial_results = value;
    }
    if let Some(value) = cli.max_links_per_page {
        research.max_level2_per_page = value;
    }
    if let Some(value) = cli.max_pages {
        research.max_total_pages = Some(value);
    }
    if let Some(value) = cli.timeout {
        research.request_timeout_sec = value;
    }
    if let Some(value) = cli.deadline {
        research.overall_deadline_sec = value;
    }
    if let Some(value) = cli.concurrency {
        research.max_concurrency = value;
    }
    if let Some(value) = cli.host_interval_ms {
        research.per_host_min_interval_ms = value;
    }
    if let Some(value) = cli.retries {
        research.max_retries = value;
    }
    if let Some(value) = &cli.user_agent {
        research.user_agent = value.clone();
    }
    if let Some(value) = &cli.output_dir {
        config.output.output_dir = value.display().to_string();
    }
}

/// Handles --dry-run: prints the effective configuration and exits
fn handle_dry_run(config: &Config, query: &str) {
    println!("=== Kumo-Research Dry Run ===\n");
    println!("Query: {}", query);
    println!();
    println!("Research Configuration:");
    println!("  Max initial results: {}", config.research.max_initial_results);
    println!("  Max Level-2 per page: {}", config.research.max_level2_per_page);
    match config.research.max_total_pages {
        Some(cap) => println!("  Max total pages: {}", cap),
        None => println!("  Max total pages: unlimited"),
    }
    println!("  Request timeout: {}s", config.research.request_timeout_sec);
    println!("  Overall deadline: {}s", config.research.overall_deadline_sec);
    println!("  Max concurrency: {}", config.research.max_concurrency);
    println!(
        "  Per-host interval: {}ms",
        config.research.per_host_min_interval_ms
    );
    println!("  Max retries: {}", config.research.max_retries);
    println!("  Max bytes per page: {}", config.research.max_bytes_per_page);
    println!("  User-Agent: {}", config.research.user_agent);
    println!();
    println!("Output directory: {}", config.output.output_dir);
    println!();
    println!("✓ Configuration is valid");
}

/// Runs the research and writes the result artifacts
async fn handle_research(config: Config, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let provider = Arc::new(DuckDuckGoProvider::new(
        &config.research.user_agent,
        Duration::from_secs(config.research.request_timeout_sec),
    )?);
    let transport = Arc::new(ReqwestTransport::new(&config.research)?);

    let result = research(query, config.research.clone(), provider, transport).await?;

    tracing::info!(
        pages = result.total_pages_crawled,
        links = result.total_links_discovered,
        elapsed = result.elapsed_seconds,
        "research complete"
    );

    let output_dir = Path::new(&config.output.output_dir);
    std::fs::create_dir_all(output_dir)?;

    let stem = format!("research_{}_{}", safe_file_stem(query), timestamp());
    let json_path = output_dir.join(format!("{}.json", stem));
    let report_path = output_dir.join(format!("{}.md", stem));

    write_json(&result, &json_path)?;
    write_markdown_report(&result, &report_path)?;

    println!("Research completed!");
    println!("  Pages crawled: {}", result.total_pages_crawled);
    println!("  Links discovered: {}", result.total_links_discovered);
    println!("  Elapsed: {:.1}s", result.elapsed_seconds);
    println!("  Result: {}", json_path.display());
    println!("  Report: {}", report_path.display());

    if !result.key_findings.is_empty() {
        println!("\nKey findings:");
        for finding in &result.key_findings {
            println!("  - {}", finding);
        }
    }

    Ok(())
}

/// Derives a filesystem-safe stem from the query
fn safe_file_stem(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let stem = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    stem.chars().take(50).collect()
}

fn timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}
