use crate::config::types::CrawlerConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Files ending in `.toml` are parsed as TOML; anything else is parsed as
/// JSON. Field names are camelCase in both formats.
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Returns
///
/// * `Ok(CrawlerConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use word_tally::config::load_config;
///
/// let config = load_config(Path::new("crawl.json")).unwrap();
/// println!("Max depth: {}", config.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        parse_toml(&content)
    } else {
        parse_json(&content)
    }
}

/// Parses and validates a JSON configuration
pub fn parse_json(content: &str) -> Result<CrawlerConfig, ConfigError> {
    let config: CrawlerConfig = serde_json::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Parses and validates a TOML configuration
pub fn parse_toml(content: &str) -> Result<CrawlerConfig, ConfigError> {
    let config: CrawlerConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}
