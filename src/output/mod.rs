//! Result emitters
//!
//! The research result leaves the pipeline in two forms: the JSON wire
//! document consumed by downstream renderers (the PDF back end reads this
//! schema), and a human-readable markdown report.

mod json;
mod report;

pub use json::{document, to_json_string, write_json, ResearchDocument};
pub use report::{format_markdown_report, write_markdown_report};

use thiserror::Error;

/// Errors that can occur while emitting results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
