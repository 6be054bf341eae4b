//! Transport abstraction layer.
//!
//! A [`Transport`] performs one GET against the web API and hands back the raw body. The
//! client never looks at HTTP details beyond that, so the same accessors run against the
//! live service ([`HttpTransport`]), recorded fixtures ([`FixtureTransport`]) or a wrapper that
//! captures live traffic for later replay ([`RecordingTransport`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use kiva_client::transport::{HttpTransport, RequestContext, Transport};
//!
//! # async fn example() -> kiva_client::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let query = vec![("page".to_owned(), "2".to_owned())];
//!
//! let ctx = RequestContext {
//!     base_url: "http://api.kivaws.org/v1",
//!     path: "/loans/newest.json",
//!     query: &query,
//! };
//!
//! let response = transport.get(ctx).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::error::Result;

pub mod fixture;
pub mod http;

pub use fixture::{FixtureTransport, RecordingTransport};
pub use http::HttpTransport;

/// Request context for transport operations.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// API root (e.g., <http://api.kivaws.org/v1>).
    pub base_url: &'a str,
    /// Request path relative to the root (e.g., "/partners.json").
    pub path: &'a str,
    /// Query pairs, appended in order.
    pub query: &'a [(String, String)],
}

impl RequestContext<'_> {
    /// Joins base URL and path without doubling the separating slash.
    #[must_use]
    pub fn full_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    /// Path plus sorted, percent-encoded query string.
    ///
    /// This is the identity of a request for replay purposes; it deliberately ignores the
    /// base URL so fixtures recorded against one host replay against any other.
    ///
    /// ```
    /// use kiva_client::transport::RequestContext;
    ///
    /// let query = vec![
    ///     ("sort_by".to_owned(), "newest".to_owned()),
    ///     ("page".to_owned(), "2".to_owned()),
    /// ];
    /// let ctx = RequestContext { base_url: "http://localhost", path: "/loans/search.json", query: &query };
    /// assert_eq!(ctx.fixture_key(), "/loans/search.json?page=2&sort_by=newest");
    /// ```
    #[must_use]
    pub fn fixture_key(&self) -> String {
        fixture_key(self.path, self.query)
    }
}

/// Builds the replay key for a path and its query pairs.
#[must_use]
pub fn fixture_key(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_owned();
    }

    let mut pairs: Vec<&(String, String)> = query.iter().collect();
    pairs.sort();

    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.into_iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    format!("{path}?{encoded}")
}

/// Response from transport operations.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

/// Transport protocol abstraction.
///
/// Implementations must turn a non-success status into an error; callers treat every
/// returned response as a body to decode.
pub trait Transport: Send + Sync {
    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is rejected, the request fails, or the server answers with
    /// a non-success status.
    fn get<'a>(
        &'a self,
        ctx: RequestContext<'a>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}
