//! Markdown report generation
//!
//! Produces the human-readable rendition of a research result: run
//! information, statistics, the executive summary, key findings, top
//! sources, and recorded failures.

use crate::crawler::ranking_cmp;
use crate::model::{ResearchResult, ScoredPage};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Sources listed in the report
const REPORT_MAX_SOURCES: usize = 20;

/// Characters of page text shown per source
const REPORT_EXCERPT_CHARS: usize = 400;

/// Writes the markdown report to a file
pub fn write_markdown_report(result: &ResearchResult, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(result);
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;
    Ok(())
}

/// Formats a research result as a markdown report
pub fn format_markdown_report(result: &ResearchResult) -> String {
    let mut md = String::new();

    md.push_str("# Deep Research Report\n\n");
    md.push_str(&format!("**Query**: {}\n\n", result.query));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", result.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", result.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n\n",
        result.elapsed_seconds
    ));

    md.push_str("## Statistics\n\n");
    md.push_str(&format!(
        "- **Initial search results**: {}\n",
        result.initial_hits.len()
    ));
    md.push_str(&format!(
        "- **Level 1 pages crawled**: {}\n",
        result.level1_pages.len()
    ));
    md.push_str(&format!(
        "- **Level 2 pages crawled**: {}\n",
        result.level2_pages.len()
    ));
    md.push_str(&format!(
        "- **Total pages crawled**: {}\n",
        result.total_pages_crawled
    ));
    md.push_str(&format!(
        "- **Links discovered**: {}\n",
        result.total_links_discovered
    ));
    md.push_str(&format!("- **Failures**: {}\n\n", result.failures.len()));

    md.push_str("## Executive Summary\n\n");
    if result.summary.is_empty() {
        md.push_str("No pages were crawled for this query.\n\n");
    } else {
        md.push_str(&result.summary);
        md.push_str("\n\n");
    }

    if !result.key_findings.is_empty() {
        md.push_str("## Key Findings\n\n");
        for (i, finding) in result.key_findings.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, finding));
        }
        md.push('\n');
    }

    let sources = ranked_sources(result);
    if !sources.is_empty() {
        md.push_str("## Sources\n\n");
        for (i, page) in sources.iter().enumerate() {
            let title = if page.page.title.is_empty() {
                "Untitled"
            } else {
                &page.page.title
            };
            md.push_str(&format!("### {}. {}\n\n", i + 1, title));
            md.push_str(&format!("- **URL**: {}\n", page.page.url));
            md.push_str(&format!("- **Relevance**: {:.2}\n", page.relevance));
            md.push_str(&format!("- **Level**: {}\n", page.page.level));
            let excerpt: String = page.page.text.chars().take(REPORT_EXCERPT_CHARS).collect();
            if !excerpt.is_empty() {
                md.push_str(&format!("\n> {}\n", excerpt));
            }
            md.push('\n');
        }
    }

    if !result.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Level | Status | Kind |\n");
        md.push_str("|-----|-------|--------|------|\n");
        for failure in &result.failures {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                failure.url, failure.level, failure.status, failure.error_kind
            ));
        }
        md.push('\n');
    }

    md
}

/// All pages in ranking order, capped for the report
fn ranked_sources(result: &ResearchResult) -> Vec<&ScoredPage> {
    let mut pages: Vec<&ScoredPage> = result.all_pages().collect();
    pages.sort_by(|a, b| ranking_cmp(a, b));
    pages.truncate(REPORT_MAX_SOURCES);
    pages
}
