use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::crawler::MatchRuleSet;
use crate::url::SkipPatterns;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl engine configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1ms, got {}ms",
            config.timeout
        )));
    }

    validate_accepted_codes(&config.accepted_codes)?;
    validate_ignored_prefixes(&config.ignored_prefixes)?;

    if config.skip.iter().any(|pattern| pattern.is_empty()) {
        return Err(ConfigError::InvalidPattern(
            "Skip pattern cannot be empty".to_string(),
        ));
    }
    SkipPatterns::compile(&config.skip)?;

    MatchRuleSet::parse(&config.match_rules)?;

    Ok(())
}

/// Validates the accepted non-2xx status codes
fn validate_accepted_codes(codes: &[u16]) -> Result<(), ConfigError> {
    for code in codes {
        if !(100..=999).contains(code) {
            return Err(ConfigError::Validation(format!(
                "accepted status code must be between 100 and 999, got {}",
                code
            )));
        }
    }
    Ok(())
}

/// Validates ignored scheme prefixes
fn validate_ignored_prefixes(prefixes: &[String]) -> Result<(), ConfigError> {
    for prefix in prefixes {
        if prefix.is_empty() {
            return Err(ConfigError::Validation(
                "ignored prefix cannot be empty".to_string(),
            ));
        }

        if prefix.contains(':') {
            return Err(ConfigError::Validation(format!(
                "ignored prefix '{}' must be given without ':'",
                prefix
            )));
        }
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.junit_path.is_empty() {
        return Err(ConfigError::Validation(
            "junit_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
