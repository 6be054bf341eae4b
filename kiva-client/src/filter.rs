//! Query builders for the search endpoints.
//!
//! Filters accumulate `key → value` query parameters. Setting the same option twice keeps
//! the last value, mirroring how the web API only honours one value per key.
//!
//! # Examples
//!
//! ```
//! use kiva_client::filter::{LoanFilter, Region};
//!
//! let filter = LoanFilter::new().male().region(Region::Africa).sector("Agriculture");
//! assert_eq!(
//!     filter.to_query(),
//!     vec![
//!         ("gender".to_owned(), "male".to_owned()),
//!         ("region".to_owned(), "af".to_owned()),
//!         ("sector".to_owned(), "Agriculture".to_owned()),
//!     ]
//! );
//! ```

use std::collections::BTreeMap;

/// Sort orders accepted by the loan search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanSort {
    /// Most viewed first.
    Popularity,
    /// Largest requested amount first.
    LoanAmount,
    /// Oldest posting first.
    Oldest,
    /// Closest to expiring first.
    Expiration,
    /// Newest posting first.
    Newest,
    /// Smallest remaining amount first.
    AmountRemaining,
    /// Shortest repayment term first.
    RepaymentTerm,
}

impl LoanSort {
    /// Returns the query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::LoanAmount => "loan_amount",
            Self::Oldest => "oldest",
            Self::Expiration => "expiration",
            Self::Newest => "newest",
            Self::AmountRemaining => "amount_remaining",
            Self::RepaymentTerm => "repayment_term",
        }
    }
}

/// Sort orders accepted when listing a lender's loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenderLoanSort {
    /// Most recent loan first.
    Newest,
    /// Earliest loan first.
    Oldest,
}

impl LenderLoanSort {
    /// Returns the query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

/// Borrower gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// Male borrowers.
    Male,
    /// Female borrowers.
    Female,
}

impl Gender {
    /// Returns the query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Loan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// Still raising money.
    Fundraising,
    /// Fully funded, not yet disbursed.
    Funded,
    /// Being repaid.
    InRepayment,
    /// Repaid in full.
    Paid,
    /// Defaulted.
    Defaulted,
}

impl LoanStatus {
    /// Returns the query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fundraising => "fundraising",
            Self::Funded => "funded",
            Self::InRepayment => "in_repayment",
            Self::Paid => "paid",
            Self::Defaulted => "defaulted",
        }
    }
}

/// World regions understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// `na`
    NorthAmerica,
    /// `ca`
    CentralAmerica,
    /// `sa`
    SouthAmerica,
    /// `af`
    Africa,
    /// `as`
    Asia,
    /// `me`
    MiddleEast,
    /// `ee`
    EasternEurope,
}

impl Region {
    /// Returns the two-letter region code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NorthAmerica => "na",
            Self::CentralAmerica => "ca",
            Self::SouthAmerica => "sa",
            Self::Africa => "af",
            Self::Asia => "as",
            Self::MiddleEast => "me",
            Self::EasternEurope => "ee",
        }
    }
}

/// Builder for `/loans/search.json` queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    params: BTreeMap<String, String>,
}

impl LoanFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort_by(self, sort: LoanSort) -> Self {
        self.with("sort_by", sort.as_str())
    }

    /// Restricts to borrowers of one gender.
    #[must_use]
    pub fn gender(self, gender: Gender) -> Self {
        self.with("gender", gender.as_str())
    }

    /// Restricts to loans in one status.
    #[must_use]
    pub fn status(self, status: LoanStatus) -> Self {
        self.with("status", status.as_str())
    }

    /// Restricts to one region.
    #[must_use]
    pub fn region(self, region: Region) -> Self {
        self.with("region", region.as_str())
    }

    /// Restricts to one sector, e.g. "Agriculture".
    #[must_use]
    pub fn sector(self, sector: impl Into<String>) -> Self {
        self.with("sector", sector)
    }

    /// Restricts to one country (ISO 3166-1 alpha-2).
    #[must_use]
    pub fn country_code(self, iso_code: impl Into<String>) -> Self {
        self.with("country_code", iso_code)
    }

    /// Full-text query.
    #[must_use]
    pub fn query(self, text: impl Into<String>) -> Self {
        self.with("q", text)
    }

    /// Requests one page of results.
    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.with("page", page.to_string())
    }

    /// `sort_by=popularity`
    #[must_use]
    pub fn popularity(self) -> Self {
        self.sort_by(LoanSort::Popularity)
    }

    /// `sort_by=loan_amount`
    #[must_use]
    pub fn loan_amount(self) -> Self {
        self.sort_by(LoanSort::LoanAmount)
    }

    /// `sort_by=oldest`
    #[must_use]
    pub fn oldest(self) -> Self {
        self.sort_by(LoanSort::Oldest)
    }

    /// `sort_by=expiration`
    #[must_use]
    pub fn expiration(self) -> Self {
        self.sort_by(LoanSort::Expiration)
    }

    /// `sort_by=newest`
    #[must_use]
    pub fn newest(self) -> Self {
        self.sort_by(LoanSort::Newest)
    }

    /// `sort_by=amount_remaining`
    #[must_use]
    pub fn amount_remaining(self) -> Self {
        self.sort_by(LoanSort::AmountRemaining)
    }

    /// `sort_by=repayment_term`
    #[must_use]
    pub fn repayment_term(self) -> Self {
        self.sort_by(LoanSort::RepaymentTerm)
    }

    /// `gender=male`
    #[must_use]
    pub fn male(self) -> Self {
        self.gender(Gender::Male)
    }

    /// `gender=female`
    #[must_use]
    pub fn female(self) -> Self {
        self.gender(Gender::Female)
    }

    /// `status=fundraising`
    #[must_use]
    pub fn fundraising(self) -> Self {
        self.status(LoanStatus::Fundraising)
    }

    /// `status=funded`
    #[must_use]
    pub fn funded(self) -> Self {
        self.status(LoanStatus::Funded)
    }

    /// `status=in_repayment`
    #[must_use]
    pub fn in_repayment(self) -> Self {
        self.status(LoanStatus::InRepayment)
    }

    /// `status=paid`
    #[must_use]
    pub fn paid(self) -> Self {
        self.status(LoanStatus::Paid)
    }

    /// `status=defaulted`
    #[must_use]
    pub fn defaulted(self) -> Self {
        self.status(LoanStatus::Defaulted)
    }

    /// `region=na`
    #[must_use]
    pub fn north_america(self) -> Self {
        self.region(Region::NorthAmerica)
    }

    /// `region=ca`
    #[must_use]
    pub fn central_america(self) -> Self {
        self.region(Region::CentralAmerica)
    }

    /// `region=sa`
    #[must_use]
    pub fn south_america(self) -> Self {
        self.region(Region::SouthAmerica)
    }

    /// `region=af`
    #[must_use]
    pub fn africa(self) -> Self {
        self.region(Region::Africa)
    }

    /// `region=as`
    #[must_use]
    pub fn asia(self) -> Self {
        self.region(Region::Asia)
    }

    /// `region=me`
    #[must_use]
    pub fn middle_east(self) -> Self {
        self.region(Region::MiddleEast)
    }

    /// `region=ee`
    #[must_use]
    pub fn eastern_europe(self) -> Self {
        self.region(Region::EasternEurope)
    }

    /// Sets the page in place; used by accessors that take a separate page argument.
    pub fn set_page(&mut self, page: u32) {
        self.params.insert("page".to_owned(), page.to_string());
    }

    /// Accumulated parameters.
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Parameters as query pairs, sorted by key.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        to_pairs(&self.params)
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }
}

/// Media attached to journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    /// Entries with any media.
    Any,
    /// Entries with a photo.
    Photo,
    /// Entries with a video.
    Video,
}

impl Media {
    /// Returns the query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }
}

/// Sort orders accepted by the journal search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalSort {
    /// Newest entry first.
    Newest,
    /// Oldest entry first.
    Oldest,
    /// Most recommended first.
    RecommendationCount,
    /// Most commented first.
    CommentCount,
}

impl JournalSort {
    /// Returns the query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::RecommendationCount => "recommendation_count",
            Self::CommentCount => "comment_count",
        }
    }
}

/// Builder for `/journal_entries/search.json` queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalFilter {
    params: BTreeMap<String, String>,
}

impl JournalFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to entries carrying media.
    #[must_use]
    pub fn media(self, media: Media) -> Self {
        self.with("media", media.as_str())
    }

    /// `media=any`
    #[must_use]
    pub fn media_any(self) -> Self {
        self.media(Media::Any)
    }

    /// `media=photo`
    #[must_use]
    pub fn media_photo(self) -> Self {
        self.media(Media::Photo)
    }

    /// `media=video`
    #[must_use]
    pub fn media_video(self) -> Self {
        self.media(Media::Video)
    }

    /// Includes or excludes bulk entries.
    #[must_use]
    pub fn include_bulk(self, include: bool) -> Self {
        self.with("include_bulk", include.to_string())
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort_by(self, sort: JournalSort) -> Self {
        self.with("sort_by", sort.as_str())
    }

    /// Restricts to entries about loans of one field partner.
    #[must_use]
    pub fn partner(self, partner_id: u64) -> Self {
        self.with("partner", partner_id.to_string())
    }

    /// Full-text query.
    #[must_use]
    pub fn query(self, text: impl Into<String>) -> Self {
        self.with("q", text)
    }

    /// Requests one page of results.
    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.with("page", page.to_string())
    }

    /// Sets the page in place.
    pub fn set_page(&mut self, page: u32) {
        self.params.insert("page".to_owned(), page.to_string());
    }

    /// Accumulated parameters.
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Parameters as query pairs, sorted by key.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        to_pairs(&self.params)
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }
}

fn to_pairs(params: &BTreeMap<String, String>) -> Vec<(String, String)> {
    params.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
