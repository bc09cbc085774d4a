use crate::ConfigError;
use regex::{Regex, RegexBuilder};

/// Compiled set of skip patterns
///
/// A URL is skipped when it contains a pattern as a plain substring, or when
/// it matches the pattern as a glob. In globs `*` stands for any run of
/// characters (including none); every other character is literal. Glob
/// matching is case-insensitive and covers the whole URL.
#[derive(Debug, Clone, Default)]
pub struct SkipPatterns {
    patterns: Vec<(String, Regex)>,
}

impl SkipPatterns {
    /// Compiles the configured patterns
    ///
    /// # Returns
    ///
    /// * `Ok(SkipPatterns)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - A pattern could not be compiled
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(&glob_to_regex(pattern))
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (pattern.clone(), regex))
                    .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if `url` matches any pattern
    ///
    /// ```
    /// use link_inspector::url::SkipPatterns;
    ///
    /// let patterns = SkipPatterns::compile(&["*linkedin*".to_string(), "to-skip".to_string()]).unwrap();
    /// assert!(patterns.matches("https://www.linkedin.com/in/someone"));
    /// assert!(patterns.matches("https://external.com/to-skip"));
    /// assert!(!patterns.matches("https://external.com/1"));
    /// ```
    pub fn matches(&self, url: &str) -> bool {
        self.patterns
            .iter()
            .any(|(raw, regex)| url.contains(raw.as_str()) || regex.is_match(url))
    }

    /// Returns true if no patterns are configured
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Translates a `*` glob into an anchored regular expression
fn glob_to_regex(pattern: &str) -> String {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{}$", body)
}
