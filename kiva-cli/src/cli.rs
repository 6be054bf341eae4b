//! Command-line interface definition.
//!
//! Parses user input into [`Cli`] and turns the string options into the client's typed
//! filter values.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kiva_client::filter::{
    Gender, JournalFilter, JournalSort, LenderLoanSort, LoanFilter, LoanSort, LoanStatus, Media,
    Region,
};

#[derive(Debug, Parser)]
#[command(name = "kiva", version, about = "Query the Kiva microfinance web API")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "KIVA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API root, overriding the configuration (e.g. http://api.kivaws.org/v1)
    #[arg(long, env = "KIVA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Answer from a recorded fixture file instead of the network
    #[arg(long, global = true, conflicts_with = "record")]
    pub fixtures: Option<PathBuf>,

    /// Record every exchange into a fixture file
    #[arg(long, global = true)]
    pub record: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load loans by id
    Loans {
        /// Loan ids
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// List the newest fundraising loans
    Newest {
        #[arg(long)]
        page: Option<u32>,
    },

    /// Search loans
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// kiva search --gender female --region af --status fundraising
    /// ```
    Search {
        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,
        #[arg(long, value_parser = parse_status)]
        status: Option<LoanStatus>,
        #[arg(long, value_parser = parse_region)]
        region: Option<Region>,
        #[arg(long, value_parser = parse_loan_sort)]
        sort: Option<LoanSort>,
        #[arg(long)]
        sector: Option<String>,
        /// ISO 3166-1 alpha-2 country code
        #[arg(long)]
        country: Option<String>,
        /// Full-text query
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },

    /// List the loans of one or more lenders
    LenderLoans {
        /// Lender uids
        #[arg(required = true)]
        uids: Vec<String>,
        #[arg(long, value_parser = parse_lender_loan_sort)]
        sort: Option<LenderLoanSort>,
        #[arg(long)]
        page: Option<u32>,
    },

    /// Load lenders by uid
    Lenders {
        /// Lender uids
        #[arg(required = true)]
        uids: Vec<String>,
    },

    /// List the lenders of a loan
    LoanLenders {
        loan_id: u64,
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show the most recent lending actions
    LendingActions,

    /// List the journal entries of a loan
    Journal {
        loan_id: u64,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        include_bulk: Option<bool>,
        /// Also fetch the comments of every entry
        #[arg(long)]
        with_comments: bool,
    },

    /// Search journal entries
    SearchJournal {
        #[arg(long, value_parser = parse_media)]
        media: Option<Media>,
        #[arg(long, value_parser = parse_journal_sort)]
        sort: Option<JournalSort>,
        #[arg(long)]
        partner: Option<u64>,
        #[arg(long)]
        include_bulk: Option<bool>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },

    /// List the comments on a journal entry
    Comments { entry_id: u64 },

    /// List field partners
    Partners {
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show the deployed API release
    Release,

    /// List image URL templates
    Templates,
}

impl Commands {
    /// Builds the loan filter of a `search` command.
    pub fn loan_filter(&self) -> Option<LoanFilter> {
        let Self::Search { gender, status, region, sort, sector, country, query, .. } = self
        else {
            return None;
        };

        let mut filter = LoanFilter::new();
        if let Some(gender) = gender {
            filter = filter.gender(*gender);
        }
        if let Some(status) = status {
            filter = filter.status(*status);
        }
        if let Some(region) = region {
            filter = filter.region(*region);
        }
        if let Some(sort) = sort {
            filter = filter.sort_by(*sort);
        }
        if let Some(sector) = sector {
            filter = filter.sector(sector.as_str());
        }
        if let Some(country) = country {
            filter = filter.country_code(country.as_str());
        }
        if let Some(query) = query {
            filter = filter.query(query.as_str());
        }
        Some(filter)
    }

    /// Builds the journal filter of a `search-journal` command.
    pub fn journal_filter(&self) -> Option<JournalFilter> {
        let Self::SearchJournal { media, sort, partner, include_bulk, query, .. } = self else {
            return None;
        };

        let mut filter = JournalFilter::new();
        if let Some(media) = media {
            filter = filter.media(*media);
        }
        if let Some(sort) = sort {
            filter = filter.sort_by(*sort);
        }
        if let Some(partner) = partner {
            filter = filter.partner(*partner);
        }
        if let Some(include_bulk) = include_bulk {
            filter = filter.include_bulk(*include_bulk);
        }
        if let Some(query) = query {
            filter = filter.query(query.as_str());
        }
        Some(filter)
    }
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    match value {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        _ => Err(format!("unknown gender '{value}', expected male or female")),
    }
}

fn parse_status(value: &str) -> Result<LoanStatus, String> {
    match value {
        "fundraising" => Ok(LoanStatus::Fundraising),
        "funded" => Ok(LoanStatus::Funded),
        "in_repayment" => Ok(LoanStatus::InRepayment),
        "paid" => Ok(LoanStatus::Paid),
        "defaulted" => Ok(LoanStatus::Defaulted),
        _ => Err(format!("unknown status '{value}'")),
    }
}

fn parse_region(value: &str) -> Result<Region, String> {
    match value {
        "na" => Ok(Region::NorthAmerica),
        "ca" => Ok(Region::CentralAmerica),
        "sa" => Ok(Region::SouthAmerica),
        "af" => Ok(Region::Africa),
        "as" => Ok(Region::Asia),
        "me" => Ok(Region::MiddleEast),
        "ee" => Ok(Region::EasternEurope),
        _ => Err(format!("unknown region '{value}', expected one of na ca sa af as me ee")),
    }
}

fn parse_loan_sort(value: &str) -> Result<LoanSort, String> {
    match value {
        "popularity" => Ok(LoanSort::Popularity),
        "loan_amount" => Ok(LoanSort::LoanAmount),
        "oldest" => Ok(LoanSort::Oldest),
        "expiration" => Ok(LoanSort::Expiration),
        "newest" => Ok(LoanSort::Newest),
        "amount_remaining" => Ok(LoanSort::AmountRemaining),
        "repayment_term" => Ok(LoanSort::RepaymentTerm),
        _ => Err(format!("unknown sort order '{value}'")),
    }
}

fn parse_lender_loan_sort(value: &str) -> Result<LenderLoanSort, String> {
    match value {
        "newest" => Ok(LenderLoanSort::Newest),
        "oldest" => Ok(LenderLoanSort::Oldest),
        _ => Err(format!("unknown sort order '{value}', expected newest or oldest")),
    }
}

fn parse_media(value: &str) -> Result<Media, String> {
    match value {
        "any" => Ok(Media::Any),
        "photo" => Ok(Media::Photo),
        "video" => Ok(Media::Video),
        _ => Err(format!("unknown media '{value}', expected any, photo or video")),
    }
}

fn parse_journal_sort(value: &str) -> Result<JournalSort, String> {
    match value {
        "newest" => Ok(JournalSort::Newest),
        "oldest" => Ok(JournalSort::Oldest),
        "recommendation_count" => Ok(JournalSort::RecommendationCount),
        "comment_count" => Ok(JournalSort::CommentCount),
        _ => Err(format!("unknown sort order '{value}'")),
    }
}
