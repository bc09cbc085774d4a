//! HTML link extraction
//!
//! This module finds outbound references in a fetched page. Which
//! tag/attribute pairs count as links is decided by a [`MatchRuleSet`]:
//! - `a/href`
//! - `script/src`
//! - `link/href`
//! - `img/src`
//! - `iframe/src`

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while extracting links
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unknown match rule '{0}'")]
    UnknownRule(String),

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// A recognized `(tag, attribute)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    AnchorHref,
    ScriptSrc,
    LinkHref,
    ImgSrc,
    IframeSrc,
}

impl MatchRule {
    /// Every known rule, in matching order
    pub const ALL: [MatchRule; 5] = [
        MatchRule::AnchorHref,
        MatchRule::ScriptSrc,
        MatchRule::LinkHref,
        MatchRule::ImgSrc,
        MatchRule::IframeSrc,
    ];

    /// The tag name this rule applies to
    pub fn tag(&self) -> &'static str {
        match self {
            MatchRule::AnchorHref => "a",
            MatchRule::ScriptSrc => "script",
            MatchRule::LinkHref => "link",
            MatchRule::ImgSrc => "img",
            MatchRule::IframeSrc => "iframe",
        }
    }

    /// The attribute holding the reference
    pub fn attribute(&self) -> &'static str {
        match self {
            MatchRule::AnchorHref | MatchRule::LinkHref => "href",
            MatchRule::ScriptSrc | MatchRule::ImgSrc | MatchRule::IframeSrc => "src",
        }
    }
}

impl FromStr for MatchRule {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        MatchRule::ALL
            .into_iter()
            .find(|rule| id == format!("{}/{}", rule.tag(), rule.attribute()))
            .ok_or_else(|| ExtractError::UnknownRule(s.to_string()))
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tag(), self.attribute())
    }
}

/// The rule identifiers in effect for a run
///
/// Identifiers are kept as given and resolved each time links are extracted,
/// so an unknown identifier fails the extraction that uses it. Use
/// [`MatchRuleSet::parse`] to reject unknown identifiers up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRuleSet {
    identifiers: Vec<String>,
}

impl MatchRuleSet {
    /// Wraps identifiers without checking them
    pub fn new(identifiers: Vec<String>) -> Self {
        Self { identifiers }
    }

    /// Builds a rule set, failing on the first unknown identifier
    ///
    /// # Arguments
    ///
    /// * `identifiers` - Rule identifiers such as `a/href`
    ///
    /// # Returns
    ///
    /// * `Ok(MatchRuleSet)` - Every identifier is known
    /// * `Err(ExtractError::UnknownRule)` - An identifier is not recognized
    pub fn parse(identifiers: &[String]) -> Result<Self, ExtractError> {
        let set = Self::new(identifiers.to_vec());
        set.rules()?;
        Ok(set)
    }

    /// Returns true if no identifiers were given (every rule applies)
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Resolves the identifiers into rules
    ///
    /// An empty set resolves to every known rule.
    pub fn rules(&self) -> Result<Vec<MatchRule>, ExtractError> {
        if self.identifiers.is_empty() {
            return Ok(MatchRule::ALL.to_vec());
        }
        self.identifiers.iter().map(|id| id.parse()).collect()
    }
}

/// Extracts the distinct references a page links to
///
/// Every element is matched against the rules in order; the first rule whose
/// tag matches and whose attribute is present, non-empty and not a same-page
/// fragment (`#...`) contributes its value.
///
/// # Arguments
///
/// * `body` - The page markup
/// * `rules` - Which tag/attribute pairs count as links
///
/// # Returns
///
/// * `Ok(HashSet<String>)` - Raw reference strings, not yet canonicalized
/// * `Err(ExtractError::UnknownRule)` - The rule set holds an unknown identifier
/// * `Err(ExtractError::InvalidSelector)` - The element selector failed to parse
///
/// # Example
///
/// ```
/// use link_inspector::crawler::{extract_links, MatchRuleSet};
///
/// let html = r#"<a href="/about">About</a><img src="logo.png">"#;
/// let links = extract_links(html, &MatchRuleSet::default()).unwrap();
/// assert!(links.contains("/about"));
/// assert!(links.contains("logo.png"));
/// ```
pub fn extract_links(body: &str, rules: &MatchRuleSet) -> Result<HashSet<String>, ExtractError> {
    let rules = rules.rules()?;
    let document = Html::parse_document(body);
    let mut links = HashSet::new();

    let all = selector("*")?;

    for element in document.select(&all) {
        let element = element.value();
        let found = rules
            .iter()
            .filter(|rule| element.name().eq_ignore_ascii_case(rule.tag()))
            .find_map(|rule| element.attr(rule.attribute()))
            .map(str::trim)
            .filter(|value| !value.is_empty() && !value.starts_with('#'));

        if let Some(value) = found {
            links.insert(value.to_string());
        }
    }

    Ok(links)
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}
