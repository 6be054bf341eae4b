//! Error types for the Kiva client.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Network Errors** ([`KivaError::HttpError`], [`KivaError::UnexpectedStatus`],
//!   [`KivaError::TransportError`]): HTTP communication failures
//! - **Payload Errors** ([`KivaError::DecodeError`], [`KivaError::MissingKey`]): the API
//!   answered with something that is not the documented JSON envelope
//! - **Validation Errors** ([`KivaError::InvalidUrl`], [`KivaError::InvalidInput`],
//!   [`KivaError::ConfigError`]): caller-supplied input was rejected
//! - **Replay Errors** ([`KivaError::FixtureNotFound`]): an offline fixture transport was asked
//!   for a request it never recorded
//!
//! Hydration itself never produces an error: unknown keys are ignored and unparseable dates
//! are kept verbatim.
//!
//! # Examples
//!
//! ```
//! use kiva_client::error::{KivaError, Result};
//!
//! fn require_id(id: &str) -> Result<&str> {
//!     if id.is_empty() {
//!         return Err(KivaError::InvalidInput("id must not be empty".to_owned()));
//!     }
//!     Ok(id)
//! }
//!
//! assert!(require_id("").is_err());
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, KivaError>;

/// Errors that can occur while talking to the Kiva web API.
///
/// # Error Recovery
///
/// - **Transient errors** ([`HttpError`](Self::HttpError),
///   [`UnexpectedStatus`](Self::UnexpectedStatus)): retrying is up to the caller; the
///   client never retries on its own
/// - **Payload errors** ([`DecodeError`](Self::DecodeError), [`MissingKey`](Self::MissingKey)):
///   usually mean the web API changed shape
/// - **Validation errors**: fix the input and call again
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum KivaError {
    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code returned by the server.
        status: u16,
        /// Fully qualified URL that was requested.
        url: String,
    },

    /// The response body is not valid JSON.
    ///
    /// This is the only failure the hydration pipeline surfaces; it is raised before any
    /// record is built.
    #[error("invalid JSON response: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// The decoded document lacks the documented top-level key (e.g. `"loans"`).
    #[error("response is missing top-level key `{0}`")]
    MissingKey(String),

    /// A base URL or endpoint path was rejected.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport refused or failed to execute a request.
    #[error("transport error: {0}")]
    TransportError(String),

    /// A replay transport has no recorded response for the request.
    #[error("no fixture recorded for {0}")]
    FixtureNotFound(String),

    /// Configuration could not be read or failed validation.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// An argument passed to an accessor was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
