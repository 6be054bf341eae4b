//! Endpoint path resolution.
//!
//! Resolvers map each resource accessor to a path relative to the API base URL. The
//! [`DefaultEndpointResolver`] knows the v1 layout; [`ConfigurableEndpointResolver`] lets a
//! config file override individual paths, using `{id}` as the identifier placeholder.

use crate::config::EndpointConfig;

/// Maps resource accessors to URL paths.
///
/// `ids` arguments are already joined with `,` (see [`join_ids`]).
pub trait EndpointResolver: Send + Sync {
    /// Loans by id: `/loans/{ids}.json`.
    fn loans_endpoint(&self, ids: &str) -> String;

    /// Newest fundraising loans: `/loans/newest.json`.
    fn newest_loans_endpoint(&self) -> String;

    /// Loan search: `/loans/search.json`.
    fn search_loans_endpoint(&self) -> String;

    /// Loans made by lenders: `/lenders/{ids}/loans.json`.
    fn lender_loans_endpoint(&self, lender_ids: &str) -> String;

    /// Lenders by id: `/lenders/{ids}.json`.
    fn lenders_endpoint(&self, ids: &str) -> String;

    /// Lenders of one loan: `/loans/{id}/lenders.json`.
    fn loan_lenders_endpoint(&self, loan_id: &str) -> String;

    /// Recent lending actions: `/lending_actions/recent.json`.
    fn recent_lending_actions_endpoint(&self) -> String;

    /// Journal entries of one loan: `/loans/{id}/journal_entries.json`.
    fn loan_journal_entries_endpoint(&self, loan_id: &str) -> String;

    /// Journal entry search: `/journal_entries/search.json`.
    fn search_journal_entries_endpoint(&self) -> String;

    /// Comments on one journal entry: `/journal_entries/{id}/comments.json`.
    fn journal_entry_comments_endpoint(&self, entry_id: &str) -> String;

    /// Field partners: `/partners.json`.
    fn partners_endpoint(&self) -> String;

    /// Current API release: `/releases/api/current.json`.
    fn current_release_endpoint(&self) -> String;

    /// Image URL templates: `/templates/images.json`.
    fn image_templates_endpoint(&self) -> String;
}

/// Joins identifiers with `,`, the separator the web API expects for multi-id lookups.
///
/// Each identifier is percent-encoded as a path segment, so a uid can never inject a
/// query, a path separator or an extra id.
///
/// ```
/// use kiva_client::endpoint::join_ids;
///
/// assert_eq!(join_ids(&[95_693, 95_189]), "95693,95189");
/// assert_eq!(join_ids(&["tim9918"]), "tim9918");
/// assert_eq!(join_ids(&["a?b=c"]), "a%3Fb%3Dc");
/// ```
#[must_use]
pub fn join_ids<I: ToString>(ids: &[I]) -> String {
    ids.iter()
        .map(|id| urlencoding::encode(&id.to_string()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolver for the stock v1 layout.
#[derive(Debug, Clone)]
pub struct DefaultEndpointResolver;

impl Default for DefaultEndpointResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultEndpointResolver {
    /// Creates a new default endpoint resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EndpointResolver for DefaultEndpointResolver {
    fn loans_endpoint(&self, ids: &str) -> String {
        format!("/loans/{ids}.json")
    }

    fn newest_loans_endpoint(&self) -> String {
        "/loans/newest.json".to_owned()
    }

    fn search_loans_endpoint(&self) -> String {
        "/loans/search.json".to_owned()
    }

    fn lender_loans_endpoint(&self, lender_ids: &str) -> String {
        format!("/lenders/{lender_ids}/loans.json")
    }

    fn lenders_endpoint(&self, ids: &str) -> String {
        format!("/lenders/{ids}.json")
    }

    fn loan_lenders_endpoint(&self, loan_id: &str) -> String {
        format!("/loans/{loan_id}/lenders.json")
    }

    fn recent_lending_actions_endpoint(&self) -> String {
        "/lending_actions/recent.json".to_owned()
    }

    fn loan_journal_entries_endpoint(&self, loan_id: &str) -> String {
        format!("/loans/{loan_id}/journal_entries.json")
    }

    fn search_journal_entries_endpoint(&self) -> String {
        "/journal_entries/search.json".to_owned()
    }

    fn journal_entry_comments_endpoint(&self, entry_id: &str) -> String {
        format!("/journal_entries/{entry_id}/comments.json")
    }

    fn partners_endpoint(&self) -> String {
        "/partners.json".to_owned()
    }

    fn current_release_endpoint(&self) -> String {
        "/releases/api/current.json".to_owned()
    }

    fn image_templates_endpoint(&self) -> String {
        "/templates/images.json".to_owned()
    }
}

/// Resolver honouring per-endpoint overrides from [`EndpointConfig`].
///
/// Unset overrides fall back to [`DefaultEndpointResolver`].
#[derive(Debug, Clone)]
pub struct ConfigurableEndpointResolver {
    config: EndpointConfig,
    fallback: DefaultEndpointResolver,
}

impl ConfigurableEndpointResolver {
    /// Creates a new configurable endpoint resolver.
    #[must_use]
    pub fn new(config: &EndpointConfig) -> Self {
        Self { config: config.clone(), fallback: DefaultEndpointResolver::new() }
    }
}

fn fixed(path: Option<&String>, default: impl FnOnce() -> String) -> String {
    path.map_or_else(default, Clone::clone)
}

fn templated(template: Option<&String>, id: &str, default: impl FnOnce() -> String) -> String {
    template.map_or_else(default, |template| template.replace("{id}", id))
}

impl EndpointResolver for ConfigurableEndpointResolver {
    fn loans_endpoint(&self, ids: &str) -> String {
        templated(self.config.loans.as_ref(), ids, || self.fallback.loans_endpoint(ids))
    }

    fn newest_loans_endpoint(&self) -> String {
        fixed(self.config.newest_loans.as_ref(), || self.fallback.newest_loans_endpoint())
    }

    fn search_loans_endpoint(&self) -> String {
        fixed(self.config.search_loans.as_ref(), || self.fallback.search_loans_endpoint())
    }

    fn lender_loans_endpoint(&self, lender_ids: &str) -> String {
        templated(self.config.lender_loans.as_ref(), lender_ids, || {
            self.fallback.lender_loans_endpoint(lender_ids)
        })
    }

    fn lenders_endpoint(&self, ids: &str) -> String {
        templated(self.config.lenders.as_ref(), ids, || self.fallback.lenders_endpoint(ids))
    }

    fn loan_lenders_endpoint(&self, loan_id: &str) -> String {
        templated(self.config.loan_lenders.as_ref(), loan_id, || {
            self.fallback.loan_lenders_endpoint(loan_id)
        })
    }

    fn recent_lending_actions_endpoint(&self) -> String {
        fixed(self.config.recent_lending_actions.as_ref(), || {
            self.fallback.recent_lending_actions_endpoint()
        })
    }

    fn loan_journal_entries_endpoint(&self, loan_id: &str) -> String {
        templated(self.config.loan_journal_entries.as_ref(), loan_id, || {
            self.fallback.loan_journal_entries_endpoint(loan_id)
        })
    }

    fn search_journal_entries_endpoint(&self) -> String {
        fixed(self.config.search_journal_entries.as_ref(), || {
            self.fallback.search_journal_entries_endpoint()
        })
    }

    fn journal_entry_comments_endpoint(&self, entry_id: &str) -> String {
        templated(self.config.journal_entry_comments.as_ref(), entry_id, || {
            self.fallback.journal_entry_comments_endpoint(entry_id)
        })
    }

    fn partners_endpoint(&self) -> String {
        fixed(self.config.partners.as_ref(), || self.fallback.partners_endpoint())
    }

    fn current_release_endpoint(&self) -> String {
        fixed(self.config.current_release.as_ref(), || self.fallback.current_release_endpoint())
    }

    fn image_templates_endpoint(&self) -> String {
        fixed(self.config.image_templates.as_ref(), || self.fallback.image_templates_endpoint())
    }
}
