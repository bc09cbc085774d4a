//! HTTP probing
//!
//! This module handles all network access for the inspector:
//! - Building the HTTP client with a proper user agent string
//! - HEAD and GET probes bounded by a per-probe timeout
//! - Classifying failures as timeouts, status codes, or transport errors
//!
//! The engine only sees the [`Probe`] trait, so tests can substitute a
//! scripted implementation for the network.

use crate::url::CanonicalUrl;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::fmt;
use std::time::Duration;

/// Maximum redirects followed by a single probe
const MAX_REDIRECTS: usize = 10;

/// HTTP method used for a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Status-only check; never yields a body
    Head,
    /// Full fetch; yields the body on success
    Get,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Head => f.write_str("HEAD"),
            Method::Get => f.write_str("GET"),
        }
    }
}

/// Why a probe did not succeed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeFailure {
    /// No response arrived within the timeout
    pub timed_out: bool,

    /// The response status, when it was outside 2xx and not accepted
    pub status_code: Option<u16>,

    /// Transport error description, when no response arrived at all
    pub reason: Option<String>,
}

impl ProbeFailure {
    /// A probe that ran out of time
    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// A response with an unaccepted status code
    pub fn status(code: u16) -> Self {
        Self {
            status_code: Some(code),
            ..Self::default()
        }
    }

    /// A transport-level failure with no response
    pub fn transport(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            return f.write_str("timed out");
        }
        match (self.status_code, &self.reason) {
            (Some(code), _) => write!(f, "status {}", code),
            (None, Some(reason)) => f.write_str(reason),
            (None, None) => f.write_str("unknown failure"),
        }
    }
}

/// One network check of a URL
#[async_trait]
pub trait Probe: Send + Sync {
    /// Requests `url` with `method`, giving up after `timeout`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The body for a successful GET; empty for HEAD and for
    ///   accepted non-2xx codes
    /// * `Err(ProbeFailure)` - Timeout, unaccepted status, or transport error
    async fn probe(
        &self,
        method: Method,
        url: &CanonicalUrl,
        timeout: Duration,
    ) -> Result<String, ProbeFailure>;
}

/// Builds the HTTP client used for probing
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_inspector::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("link-inspector/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Probe`] backed by a real HTTP client
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    accepted_codes: Vec<u16>,
}

struct Exchange {
    status: StatusCode,
    body: String,
}

impl HttpProbe {
    /// Creates a probe with a freshly built client
    ///
    /// # Arguments
    ///
    /// * `accepted_codes` - Non-2xx status codes treated as success
    pub fn new(accepted_codes: Vec<u16>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?, accepted_codes))
    }

    /// Creates a probe around an existing client
    pub fn with_client(client: Client, accepted_codes: Vec<u16>) -> Self {
        Self {
            client,
            accepted_codes,
        }
    }

    async fn exchange(&self, method: Method, url: &CanonicalUrl) -> Result<Exchange, reqwest::Error> {
        let request = match method {
            Method::Head => self.client.head(url.as_str()),
            Method::Get => self.client.get(url.as_str()),
        };

        let response = request.send().await?;
        let status = response.status();

        let body = if method == Method::Get && status.is_success() {
            response.text().await?
        } else {
            String::new()
        };

        Ok(Exchange { status, body })
    }

    fn classify(&self, exchange: Exchange) -> Result<String, ProbeFailure> {
        let code = exchange.status.as_u16();

        if exchange.status.is_success() {
            Ok(exchange.body)
        } else if self.accepted_codes.contains(&code) {
            Ok(String::new())
        } else {
            Err(ProbeFailure::status(code))
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(
        &self,
        method: Method,
        url: &CanonicalUrl,
        timeout: Duration,
    ) -> Result<String, ProbeFailure> {
        tracing::trace!("{} {}", method, url);

        match tokio::time::timeout(timeout, self.exchange(method, url)).await {
            Err(_) => Err(ProbeFailure::timed_out()),
            Ok(Err(e)) if e.is_timeout() => Err(ProbeFailure::timed_out()),
            Ok(Err(e)) => Err(ProbeFailure::transport(e.to_string())),
            Ok(Ok(exchange)) => self.classify(exchange),
        }
    }
}
