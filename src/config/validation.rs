use crate::config::types::{Config, OutputConfig, ResearchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_research(&config.research)?;
    validate_output(&config.output)?;
    Ok(())
}

/// Validates the research pipeline configuration
///
/// A zero overall deadline is deliberately allowed: a deadline that fires
/// before any fetch is a specified terminal condition, not a misconfiguration.
pub fn validate_research(config: &ResearchConfig) -> Result<(), ConfigError> {
    if config.max_initial_results < 1 {
        return Err(ConfigError::Validation(format!(
            "max_initial_results must be >= 1, got {}",
            config.max_initial_results
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.request_timeout_sec < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_sec must be >= 1, got {}",
            config.request_timeout_sec
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.max_bytes_per_page < 1024 {
        return Err(ConfigError::Validation(format!(
            "max_bytes_per_page must be >= 1024, got {}",
            config.max_bytes_per_page
        )));
    }

    if config.max_content_length < 1 {
        return Err(ConfigError::Validation(
            "max_content_length must be >= 1".to_string(),
        ));
    }

    if let Some(cap) = config.max_total_pages {
        if cap < 1 {
            return Err(ConfigError::Validation(
                "max_total_pages must be >= 1 when set".to_string(),
            ));
        }
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the output configuration
fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_deadline_is_valid() {
        let mut config = ResearchConfig::default();
        config.overall_deadline_sec = 0;
        assert!(validate_research(&config).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = ResearchConfig::default();
        config.max_concurrency = 0;
        let result = validate_research(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_excessive_concurrency_rejected() {
        let mut config = ResearchConfig::default();
        config.max_concurrency = 101;
        assert!(validate_research(&config).is_err());
    }

    #[test]
    fn test_zero_initial_results_rejected() {
        let mut config = ResearchConfig::default();
        config.max_initial_results = 0;
        assert!(validate_research(&config).is_err());
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let mut config = ResearchConfig::default();
        config.request_timeout_sec = 0;
        assert!(validate_research(&config).is_err());
    }

    #[test]
    fn test_tiny_byte_cap_rejected() {
        let mut config = ResearchConfig::default();
        config.max_bytes_per_page = 100;
        assert!(validate_research(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = ResearchConfig::default();
        config.user_agent = "  ".to_string();
        assert!(validate_research(&config).is_err());
    }

    #[test]
    fn test_zero_total_pages_cap_rejected() {
        let mut config = ResearchConfig::default();
        config.max_total_pages = Some(0);
        assert!(validate_research(&config).is_err());
    }

    #[test]
    fn test_empty_output_dir_rejected() {
        let mut config = Config::default();
        config.output.output_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
