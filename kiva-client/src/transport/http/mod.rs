//! HTTP transport over reqwest.
//!
//! Supports HTTP/1.1 and HTTP/2 through reqwest's connection pool.
//!
//! # Security
//!
//! - Only `http` and `https` base URLs are accepted
//! - Request paths are checked for traversal sequences
//! - Query values are percent-encoded by reqwest

use std::{sync::LazyLock, time::Duration};

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::{HttpConfig, HttpVersion},
    error::{KivaError, Result},
    transport::{RequestContext, Transport, TransportResponse},
};

/// Shared client with the default pool and timeouts.
///
/// Building can only fail if the TLS backend cannot initialise; the message is kept so
/// [`HttpTransport::new`] can report it.
static DEFAULT_HTTP_CLIENT: LazyLock<std::result::Result<Client, String>> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(100)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| e.to_string())
});

fn validate_url(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(KivaError::InvalidUrl(format!(
            "only http and https URLs are allowed, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(KivaError::InvalidUrl(format!("URL missing host: {url}")));
    }

    Ok(())
}

fn sanitize_path(path: &str) -> Result<&str> {
    if path.contains("..") || path.contains("//") {
        return Err(KivaError::InvalidUrl(
            "invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    if !path.starts_with('/') {
        return Err(KivaError::InvalidUrl(format!("path must start with '/': {path}")));
    }
    Ok(path)
}

/// HTTP transport implementation.
///
/// # Examples
///
/// ```rust,no_run
/// use kiva_client::{
///     config::{HttpConfig, HttpVersion},
///     transport::HttpTransport,
/// };
///
/// # fn example() -> kiva_client::error::Result<()> {
/// let transport = HttpTransport::new()?;
///
/// let config = HttpConfig { timeout_secs: 10, http_version: HttpVersion::Http1, ..Default::default() };
/// let tuned = HttpTransport::with_config(&config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a transport backed by the shared default client.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::TransportError`] if the shared client could not be built.
    pub fn new() -> Result<Self> {
        let client = DEFAULT_HTTP_CLIENT.as_ref().map_err(|e| {
            KivaError::TransportError(format!("failed to create default HTTP client: {e}"))
        })?;
        Ok(Self { client: client.clone(), http_version: HttpVersion::Auto })
    }

    /// Creates a transport with its own client tuned by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] if `config` is out of bounds, or
    /// [`KivaError::HttpError`] if the client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(KivaError::HttpError)?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(
        skip(self, ctx),
        fields(base_url = ctx.base_url, path = ctx.path, params = ctx.query.len())
    )]
    async fn execute_get(&self, ctx: RequestContext<'_>) -> Result<TransportResponse> {
        let base = Url::parse(ctx.base_url)
            .map_err(|e| KivaError::InvalidUrl(format!("invalid base_url: {e}")))?;

        validate_url(&base)?;

        let path = sanitize_path(ctx.path)?;
        let full_url = format!("{}{path}", ctx.base_url.trim_end_matches('/'));

        let mut request = self.client.get(&full_url).header("Accept", "application/json");
        if !ctx.query.is_empty() {
            request = request.query(ctx.query);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        debug!(status, "received response");

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        if !response.status().is_success() {
            return Err(KivaError::UnexpectedStatus { status, url: full_url });
        }

        let body = response.bytes().await.map_err(KivaError::HttpError)?.to_vec();

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn get<'a>(&'a self, ctx: RequestContext<'a>) -> Result<TransportResponse> {
        self.execute_get(ctx).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
