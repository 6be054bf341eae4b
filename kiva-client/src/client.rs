//! Resource accessors for the Kiva web API.
//!
//! Each accessor issues exactly one GET, decodes the body and hands the array found under
//! the endpoint's top-level key to [`populate_from`]. There is no retry, paging traversal
//! or caching; callers ask for a `page` explicitly.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    config::{ClientConfig, validate_base_url},
    endpoint::{ConfigurableEndpointResolver, EndpointResolver, join_ids},
    error::{KivaError, Result},
    filter::{JournalFilter, LenderLoanSort, LoanFilter},
    hydrate::{Hydrate, TypedField, hydrate_from, populate_from},
    models::{Comment, ImageTemplate, JournalEntry, Lender, LendingAction, Loan, Partner, Release},
    transport::{HttpTransport, RequestContext, Transport},
};

const LOANS_KEY: &str = "loans";
const LENDERS_KEY: &str = "lenders";
const LENDING_ACTIONS_KEY: &str = "lending_actions";
const JOURNAL_ENTRIES_KEY: &str = "journal_entries";
const COMMENTS_KEY: &str = "comments";
const PARTNERS_KEY: &str = "partners";
const RELEASE_KEY: &str = "release";
const TEMPLATES_KEY: &str = "templates";

/// Client for the v1 web API, generic over its [`Transport`].
///
/// # Examples
///
/// ```rust,no_run
/// use kiva_client::{KivaClient, filter::LoanFilter};
///
/// # async fn example() -> kiva_client::error::Result<()> {
/// let client = KivaClient::new()?;
///
/// let filter = LoanFilter::new().female().africa().fundraising();
/// for loan in client.search_loans(&filter, None).await? {
///     println!("{:?} {:?}", loan.name, loan.sector);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KivaClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    endpoints: ConfigurableEndpointResolver,
}

impl KivaClient<HttpTransport> {
    /// Creates a client for the public API with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::TransportError`] if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// Creates an HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] if `config` fails validation, or an HTTP error if
    /// the underlying client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Self::with_config(transport, config)
    }
}

impl<T: Transport> KivaClient<T> {
    /// Wraps a transport using the default base URL and endpoint layout.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        let config = ClientConfig::default();
        Self {
            transport,
            base_url: config.base_url,
            endpoints: ConfigurableEndpointResolver::new(&config.endpoints),
        }
    }

    /// Wraps a transport using the base URL and endpoint overrides of `config`.
    ///
    /// The `[http]` section is ignored; it only applies to [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::ConfigError`] if the base URL or an endpoint override is invalid.
    pub fn with_config(transport: T, config: &ClientConfig) -> Result<Self> {
        validate_base_url(&config.base_url)?;
        config.endpoints.validate()?;
        Ok(Self {
            transport,
            base_url: config.base_url.clone(),
            endpoints: ConfigurableEndpointResolver::new(&config.endpoints),
        })
    }

    /// API root requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the client, returning its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Loads loans by id.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if `ids` is empty, otherwise any transport,
    /// decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn loans(&self, ids: &[u64]) -> Result<Vec<Loan>> {
        let ids = require_ids(ids, "loan")?;
        self.fetch_list(&self.endpoints.loans_endpoint(&ids), &[], LOANS_KEY).await
    }

    /// Loads the newest fundraising loans.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn newest_loans(&self, page: Option<u32>) -> Result<Vec<Loan>> {
        let query = page_query(page);
        self.fetch_list(&self.endpoints.newest_loans_endpoint(), &query, LOANS_KEY).await
    }

    /// Searches loans. `page`, when given, overrides any page already set on the filter.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self, filter), fields(params = filter.params().len()))]
    pub async fn search_loans(&self, filter: &LoanFilter, page: Option<u32>) -> Result<Vec<Loan>> {
        let mut filter = filter.clone();
        if let Some(page) = page {
            filter.set_page(page);
        }
        self.fetch_list(&self.endpoints.search_loans_endpoint(), &filter.to_query(), LOANS_KEY)
            .await
    }

    /// Loads the loans made by one or more lenders, identified by their `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if `lender_ids` is empty, otherwise any transport,
    /// decode or missing-key error.
    #[instrument(skip(self, lender_ids), fields(lenders = lender_ids.len()))]
    pub async fn loans_for_lenders<S: ToString>(
        &self,
        lender_ids: &[S],
        sort: Option<LenderLoanSort>,
        page: Option<u32>,
    ) -> Result<Vec<Loan>> {
        let ids = require_ids(lender_ids, "lender")?;

        let mut query = page_query(page);
        if let Some(sort) = sort {
            query.push(("sort_by".to_owned(), sort.as_str().to_owned()));
        }

        self.fetch_list(&self.endpoints.lender_loans_endpoint(&ids), &query, LOANS_KEY).await
    }

    /// Like [`loans_for_lenders`](Self::loans_for_lenders), taking hydrated lenders.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if any lender has no `uid`.
    pub async fn loans_for_lender_records(
        &self,
        lenders: &[Lender],
        sort: Option<LenderLoanSort>,
        page: Option<u32>,
    ) -> Result<Vec<Loan>> {
        let uids = lenders
            .iter()
            .map(|lender| {
                lender
                    .uid()
                    .ok_or_else(|| KivaError::InvalidInput("lender has no uid".to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.loans_for_lenders(&uids, sort, page).await
    }

    /// Loads lenders by `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if `ids` is empty, otherwise any transport,
    /// decode or missing-key error.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn lenders<S: ToString>(&self, ids: &[S]) -> Result<Vec<Lender>> {
        let ids = require_ids(ids, "lender")?;
        self.fetch_list(&self.endpoints.lenders_endpoint(&ids), &[], LENDERS_KEY).await
    }

    /// Loads the public lenders of a loan.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn lenders_for_loan(&self, loan_id: u64, page: Option<u32>) -> Result<Vec<Lender>> {
        let query = page_query(page);
        let path = self.endpoints.loan_lenders_endpoint(&loan_id.to_string());
        self.fetch_list(&path, &query, LENDERS_KEY).await
    }

    /// Loads the most recent lending actions, each with its nested lender and loan.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn recent_lending_actions(&self) -> Result<Vec<LendingAction>> {
        let path = self.endpoints.recent_lending_actions_endpoint();
        self.fetch_list(&path, &[], LENDING_ACTIONS_KEY).await
    }

    /// Loads the journal entries of a loan.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn journal_entries(
        &self,
        loan_id: u64,
        page: Option<u32>,
        include_bulk: Option<bool>,
    ) -> Result<Vec<JournalEntry>> {
        let mut query = page_query(page);
        if let Some(include_bulk) = include_bulk {
            query.push(("include_bulk".to_owned(), include_bulk.to_string()));
        }

        let path = self.endpoints.loan_journal_entries_endpoint(&loan_id.to_string());
        self.fetch_list(&path, &query, JOURNAL_ENTRIES_KEY).await
    }

    /// Searches journal entries across all loans.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self, filter), fields(params = filter.params().len()))]
    pub async fn search_journal_entries(
        &self,
        filter: &JournalFilter,
        page: Option<u32>,
    ) -> Result<Vec<JournalEntry>> {
        let mut filter = filter.clone();
        if let Some(page) = page {
            filter.set_page(page);
        }
        let path = self.endpoints.search_journal_entries_endpoint();
        self.fetch_list(&path, &filter.to_query(), JOURNAL_ENTRIES_KEY).await
    }

    /// Loads the comments on a journal entry.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn comments(&self, entry_id: u64) -> Result<Vec<Comment>> {
        let path = self.endpoints.journal_entry_comments_endpoint(&entry_id.to_string());
        self.fetch_list(&path, &[], COMMENTS_KEY).await
    }

    /// Returns the entry's comments, fetching them on first use.
    ///
    /// Once loaded, the list is cached on the entry and later calls do not touch the
    /// transport. A failed fetch leaves the entry unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`KivaError::InvalidInput`] if the entry has no numeric `id`, otherwise as
    /// [`comments`](Self::comments).
    pub async fn load_comments<'e>(&self, entry: &'e mut JournalEntry) -> Result<&'e [Comment]> {
        if !entry.has_comments_loaded() {
            let id = entry
                .id
                .typed()
                .copied()
                .ok_or_else(|| KivaError::InvalidInput("journal entry has no id".to_owned()))?;
            let comments = self.comments(id).await?;
            entry.set_comments(comments);
        }
        Ok(entry.comments().unwrap_or_default())
    }

    /// Loads field partners.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn partners(&self, page: Option<u32>) -> Result<Vec<Partner>> {
        let query = page_query(page);
        self.fetch_list(&self.endpoints.partners_endpoint(), &query, PARTNERS_KEY).await
    }

    /// Loads the currently deployed API release.
    ///
    /// # Errors
    ///
    /// Returns any transport or decode error, or [`KivaError::MissingKey`] if the document
    /// has no `release` object.
    #[instrument(skip(self))]
    pub async fn current_release(&self) -> Result<Release> {
        let document = self.fetch(&self.endpoints.current_release_endpoint(), &[]).await?;
        hydrate_from(document, RELEASE_KEY)
    }

    /// Loads the image URL templates.
    ///
    /// # Errors
    ///
    /// Returns any transport, decode or missing-key error.
    #[instrument(skip(self))]
    pub async fn image_templates(&self) -> Result<Vec<ImageTemplate>> {
        let path = self.endpoints.image_templates_endpoint();
        self.fetch_list(&path, &[], TEMPLATES_KEY).await
    }

    #[instrument(skip(self, query), fields(protocol = self.transport.protocol_name()))]
    async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let ctx = RequestContext { base_url: &self.base_url, path, query };
        let response = self.transport.get(ctx).await?;
        let document = serde_json::from_slice(&response.body)?;
        Ok(document)
    }

    async fn fetch_list<R: Hydrate>(
        &self,
        path: &str,
        query: &[(String, String)],
        key: &str,
    ) -> Result<Vec<R>> {
        let document = self.fetch(path, query).await?;
        let records = populate_from::<R>(document, key)?;
        debug!(kind = R::KIND, count = records.len(), "populated records");
        Ok(records)
    }
}

fn page_query(page: Option<u32>) -> Vec<(String, String)> {
    page.map(|page| vec![("page".to_owned(), page.to_string())]).unwrap_or_default()
}

fn require_ids<S: ToString>(ids: &[S], what: &str) -> Result<String> {
    if ids.is_empty() {
        return Err(KivaError::InvalidInput(format!("at least one {what} id is required")));
    }
    Ok(join_ids(ids))
}
