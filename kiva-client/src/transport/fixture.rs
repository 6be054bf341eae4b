//! Offline replay and capture of API exchanges.
//!
//! A fixture maps a request's [`fixture_key`](super::fixture_key) (path plus sorted query)
//! to the body the web API returned for it. Fixture files are JSON objects:
//!
//! ```json
//! {
//!   "/partners.json": { "partners": [] },
//!   "/loans/newest.json?page=2": { "loans": [] }
//! }
//! ```
//!
//! Object and array values are re-serialised as the response body; a string value is used
//! verbatim, which lets a fixture carry a body that is not valid JSON.

use std::{collections::BTreeMap, path::Path};

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

use crate::{
    error::{KivaError, Result},
    transport::{RequestContext, Transport, TransportResponse, fixture_key},
};

/// Transport that answers from recorded bodies and never touches the network.
///
/// # Examples
///
/// ```
/// use kiva_client::transport::{FixtureTransport, RequestContext, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> kiva_client::error::Result<()> {
/// let transport = FixtureTransport::new().with_fixture("/partners.json", r#"{"partners":[]}"#);
///
/// let ctx = RequestContext { base_url: "http://api.kivaws.org/v1", path: "/partners.json", query: &[] };
/// let response = transport.get(ctx).await?;
/// assert_eq!(response.body, br#"{"partners":[]}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    fixtures: BTreeMap<String, Vec<u8>>,
}

impl FixtureTransport {
    /// Creates an empty fixture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body under a ready-made key, e.g. `"/loans/newest.json?page=2"`.
    #[must_use]
    pub fn with_fixture(mut self, key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.fixtures.insert(key.into(), body.into());
        self
    }

    /// Adds a body for a path and query.
    pub fn insert(&mut self, path: &str, query: &[(String, String)], body: impl Into<Vec<u8>>) {
        self.fixtures.insert(fixture_key(path, query), body.into());
    }

    /// Parses a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::DecodeError`] if `json` is not valid JSON and
    /// [`KivaError::InvalidInput`] if it is not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        let Value::Object(entries) = document else {
            return Err(KivaError::InvalidInput(
                "fixture document must be a JSON object".to_owned(),
            ));
        };

        let mut fixtures = BTreeMap::new();
        for (key, value) in entries {
            let body = match value {
                Value::String(raw) => raw.into_bytes(),
                other => serde_json::to_vec(&other)?,
            };
            fixtures.insert(key, body);
        }

        Ok(Self { fixtures })
    }

    /// Reads a fixture document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| KivaError::InvalidInput(format!("cannot read fixture file: {e}")))?;
        Self::from_json(&content)
    }

    /// Number of recorded exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Returns true when nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Returns true when a body is recorded under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fixtures.contains_key(key)
    }

    /// Recorded keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fixtures.keys().map(String::as_str)
    }

    /// Renders the fixture set in the on-disk format.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::DecodeError`] if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        let document: Map<String, Value> = self
            .fixtures
            .iter()
            .map(|(key, body)| (key.clone(), body_to_value(body)))
            .collect();
        Ok(serde_json::to_string_pretty(&Value::Object(document))?)
    }
}

fn body_to_value(body: &[u8]) -> Value {
    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(|value| value.is_object() || value.is_array())
        .unwrap_or_else(|| Value::String(String::from_utf8_lossy(body).into_owned()))
}

impl Transport for FixtureTransport {
    #[instrument(skip(self, ctx), fields(path = ctx.path))]
    async fn get<'a>(&'a self, ctx: RequestContext<'a>) -> Result<TransportResponse> {
        let key = ctx.fixture_key();
        let Some(body) = self.fixtures.get(&key) else {
            return Err(KivaError::FixtureNotFound(key));
        };

        debug!(%key, bytes = body.len(), "replaying fixture");
        Ok(TransportResponse {
            status: 200,
            body: body.clone(),
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        })
    }

    fn protocol_name(&self) -> &'static str {
        "fixture"
    }
}

/// Wraps another transport and records every successful exchange.
///
/// Later requests for the same key overwrite earlier ones.
#[derive(Debug)]
pub struct RecordingTransport<T> {
    inner: T,
    recorded: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl<T: Transport> RecordingTransport<T> {
    /// Starts recording requests sent through `inner`.
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self { inner, recorded: Mutex::new(BTreeMap::new()) }
    }

    /// The wrapped transport.
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Copies what has been recorded so far.
    pub async fn snapshot(&self) -> FixtureTransport {
        FixtureTransport { fixtures: self.recorded.lock().await.clone() }
    }

    /// Stops recording and returns the captured exchanges.
    #[must_use]
    pub fn into_fixtures(self) -> FixtureTransport {
        FixtureTransport { fixtures: self.recorded.into_inner() }
    }

    /// Writes the captured exchanges to `path` in the fixture file format.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if the file cannot be written.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.snapshot().await.to_json()?;
        tokio::fs::write(path.as_ref(), json)
            .await
            .map_err(|e| KivaError::InvalidInput(format!("cannot write fixture file: {e}")))
    }
}

impl<T: Transport> Transport for RecordingTransport<T> {
    async fn get<'a>(&'a self, ctx: RequestContext<'a>) -> Result<TransportResponse> {
        let response = self.inner.get(ctx).await?;

        let key = ctx.fixture_key();
        trace!(%key, bytes = response.body.len(), "recording exchange");
        self.recorded.lock().await.insert(key, response.body.clone());

        Ok(response)
    }

    fn protocol_name(&self) -> &'static str {
        self.inner.protocol_name()
    }
}
