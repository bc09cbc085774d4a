use crate::{UrlError, UrlResult};
use std::fmt;
use url::{Origin, Url};

/// An absolute URL with its fragment removed
///
/// Two references that canonicalize to the same `CanonicalUrl` are the same
/// link as far as deduplication is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the scheme + host + port triple of this URL
    pub fn origin(&self) -> Origin {
        self.0.origin()
    }

    /// Returns true if the URL starts with `<prefix>:`
    ///
    /// ```
    /// use link_inspector::url::canonicalize;
    ///
    /// let url = canonicalize("mailto:someone@example.com", None).unwrap();
    /// assert!(url.has_scheme_prefix("mailto"));
    /// assert!(!url.has_scheme_prefix("tel"));
    /// ```
    pub fn has_scheme_prefix(&self, prefix: &str) -> bool {
        self.as_str()
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(':'))
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.0.into()
    }
}

/// Canonicalizes a raw reference into an absolute, fragment-free URL
///
/// # Steps
///
/// 1. Parse `raw` as an absolute URL
/// 2. If that fails, resolve `raw` relative to `parent`
/// 3. Remove the fragment (everything after `#`)
///
/// # Arguments
///
/// * `raw` - The href or seed string as found
/// * `parent` - The page the reference was found on, if any
///
/// # Returns
///
/// * `Ok(CanonicalUrl)` - The canonical form
/// * `Err(UrlError::InvalidUrl)` - Neither absolute parsing nor relative
///   resolution succeeded
///
/// # Examples
///
/// ```
/// use link_inspector::url::canonicalize;
///
/// let url = canonicalize("/docs#install", Some("https://example.com/index.html")).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn canonicalize(raw: &str, parent: Option<&str>) -> UrlResult<CanonicalUrl> {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(absolute_err) => {
            let Some(parent) = parent else {
                return Err(invalid(raw, absolute_err));
            };
            let base = Url::parse(parent).map_err(|e| invalid(parent, e))?;
            base.join(raw).map_err(|e| invalid(raw, e))?
        }
    };

    url.set_fragment(None);

    Ok(CanonicalUrl(url))
}

fn invalid(url: &str, err: url::ParseError) -> UrlError {
    UrlError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    }
}
