//! Configuration module for Kumo-Research
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every option has a default, so an absent or empty file yields a
//! usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use kumo_research::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Overall deadline: {}s", config.research.overall_deadline_sec);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ResearchConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation entry points
pub use validation::{validate, validate_research};
