//! Client configuration.
//!
//! A [`ClientConfig`] is normally read from TOML:
//!
//! ```toml
//! base_url = "https://api.kivaws.org/v1"
//!
//! [http]
//! timeout_secs = 20
//! http_version = "http1"
//!
//! [endpoints]
//! loans = "/loans/{id}.json"
//! partners = "/partners.json"
//! ```
//!
//! Every section is optional; missing values take the defaults below.

use std::{path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{KivaError, Result};

/// Base URL of the public v1 web API.
pub const DEFAULT_BASE_URL: &str = "http://api.kivaws.org/v1";

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// API root every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP transport tuning.
    #[serde(default)]
    pub http: HttpConfig,

    /// Per-endpoint path overrides.
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http: HttpConfig::default(),
            endpoints: EndpointConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] if the TOML is malformed or fails
    /// [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use kiva_client::config::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml("base_url = \"https://api.kivaws.org/v1\"").unwrap();
    /// assert_eq!(config.http.timeout_secs, 30);
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| KivaError::ConfigError(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] if the file cannot be read or its content is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| KivaError::ConfigError(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Checks the base URL, timeouts and endpoint overrides.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] describing the first rejected value.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url)?;
        self.http.validate()?;
        self.endpoints.validate()
    }
}

/// Checks that a base URL is absolute, uses `http` or `https` and names a host.
///
/// # Errors
///
/// Returns [`KivaError::ConfigError`] otherwise.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)
        .map_err(|e| KivaError::ConfigError(format!("invalid base_url '{base_url}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(KivaError::ConfigError(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(KivaError::ConfigError(format!("base_url has no host: {base_url}")));
    }

    Ok(())
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// HTTP version preference.
    #[serde(default)]
    pub http_version: HttpVersion,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            http_version: HttpVersion::default(),
        }
    }
}

impl HttpConfig {
    /// Validates configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns error if timeout values are outside valid ranges:
    /// - `timeout_secs`: must be 1-300 seconds
    /// - `connect_timeout_secs`: must be 1-60 seconds
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(KivaError::ConfigError(
                "timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(KivaError::ConfigError(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP version preference.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 with prior knowledge.
    Http2,
    /// Let the connection negotiate.
    #[default]
    Auto,
}

/// Endpoint path overrides.
///
/// Templates use `{id}` for the (comma-joined) identifier list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    /// Loans by id (default: "/loans/{id}.json").
    pub loans: Option<String>,
    /// Newest loans (default: "/loans/newest.json").
    pub newest_loans: Option<String>,
    /// Loan search (default: "/loans/search.json").
    pub search_loans: Option<String>,
    /// Loans of lenders (default: "/lenders/{id}/loans.json").
    pub lender_loans: Option<String>,
    /// Lenders by id (default: "/lenders/{id}.json").
    pub lenders: Option<String>,
    /// Lenders of a loan (default: "/loans/{id}/lenders.json").
    pub loan_lenders: Option<String>,
    /// Recent lending actions (default: "/lending_actions/recent.json").
    pub recent_lending_actions: Option<String>,
    /// Journal entries of a loan (default: "/loans/{id}/journal_entries.json").
    pub loan_journal_entries: Option<String>,
    /// Journal entry search (default: "/journal_entries/search.json").
    pub search_journal_entries: Option<String>,
    /// Comments on a journal entry (default: "/journal_entries/{id}/comments.json").
    pub journal_entry_comments: Option<String>,
    /// Field partners (default: "/partners.json").
    pub partners: Option<String>,
    /// Current release (default: "/releases/api/current.json").
    pub current_release: Option<String>,
    /// Image templates (default: "/templates/images.json").
    pub image_templates: Option<String>,
}

impl EndpointConfig {
    /// Validates endpoint templates.
    ///
    /// Each override must start with `/` and must not contain `..` or `//`.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] naming the first invalid endpoint.
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            ("loans", &self.loans),
            ("newest_loans", &self.newest_loans),
            ("search_loans", &self.search_loans),
            ("lender_loans", &self.lender_loans),
            ("lenders", &self.lenders),
            ("loan_lenders", &self.loan_lenders),
            ("recent_lending_actions", &self.recent_lending_actions),
            ("loan_journal_entries", &self.loan_journal_entries),
            ("search_journal_entries", &self.search_journal_entries),
            ("journal_entry_comments", &self.journal_entry_comments),
            ("partners", &self.partners),
            ("current_release", &self.current_release),
            ("image_templates", &self.image_templates),
        ];

        for (name, endpoint) in endpoints {
            if let Some(path) = endpoint {
                validate_endpoint_path(name, path)?;
            }
        }

        Ok(())
    }
}

fn validate_endpoint_path(name: &str, path: &str) -> Result<()> {
    if path.contains("..") {
        return Err(KivaError::ConfigError(format!(
            "endpoint '{name}' contains path traversal sequence '..': {path}"
        )));
    }

    if path.contains("//") {
        return Err(KivaError::ConfigError(format!(
            "endpoint '{name}' contains double slash '//': {path}"
        )));
    }

    if !path.starts_with('/') {
        return Err(KivaError::ConfigError(format!(
            "endpoint '{name}' must start with '/': {path}"
        )));
    }

    Ok(())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_pool_max_idle() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
