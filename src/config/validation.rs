use crate::config::types::CrawlerConfig;
use crate::url::PatternSet;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_limits(config)?;
    validate_start_pages(&config.start_pages)?;

    // Compiling is the only way to know a pattern is usable
    PatternSet::new(&config.ignored_urls)?;
    PatternSet::new(&config.ignored_words)?;

    Ok(())
}

/// Validates numeric crawl limits
fn validate_limits(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth and popular_word_count are unsigned, so >= 0 always holds

    if config.parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be >= 1, got {}",
            config.parallelism
        )));
    }

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeoutSeconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every start page is an absolute URL the crawler can fetch
fn validate_start_pages(start_pages: &[String]) -> Result<(), ConfigError> {
    for page in start_pages {
        let url = Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start page '{}': {}", page, e)))?;

        if !matches!(url.scheme(), "http" | "https" | "file") {
            return Err(ConfigError::Validation(format!(
                "Start page '{}' must use http, https or file scheme",
                page
            )));
        }
    }

    Ok(())
}
