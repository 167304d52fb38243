use crate::ConfigError;
use regex::Regex;

/// A set of regular expressions matched against whole strings
///
/// Each pattern must match the entire candidate, not just a substring, so
/// `http://example\.com/.*` matches `http://example.com/page` but not
/// `https://mirror.net/?r=http://example.com/page`.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles a set of patterns
    ///
    /// # Arguments
    ///
    /// * `patterns` - Regular expression sources, unanchored
    ///
    /// # Returns
    ///
    /// * `Ok(PatternSet)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - The first pattern that failed to compile
    ///
    /// # Examples
    ///
    /// ```
    /// use word_tally::url::PatternSet;
    ///
    /// let set = PatternSet::new(&["http://example\\.com/private/.*"]).unwrap();
    /// assert!(set.matches("http://example.com/private/page"));
    /// assert!(!set.matches("http://example.com/public"));
    /// ```
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| compile_whole_match(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the whole candidate
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(candidate))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile_whole_match(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
