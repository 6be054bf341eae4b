//! Kiva Client: typed access to the Kiva microfinance web API
//!
//! Loans, lenders, lending actions, journal entries, comments, field partners and release
//! metadata are fetched over HTTP and turned into plain records by a table-driven hydrator.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   KivaClient     │  one accessor per endpoint
//! └────────┬─────────┘
//!          │ path + query (EndpointResolver, LoanFilter, JournalFilter)
//! ┌────────▼─────────┐
//! │    Transport     │  HttpTransport │ FixtureTransport │ RecordingTransport
//! └────────┬─────────┘
//!          │ JSON body
//! ┌────────▼─────────┐
//! │    hydrate       │  populate_from → hydrate → Field tables in models
//! └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kiva_client::{KivaClient, filter::LenderLoanSort, hydrate::FieldValue};
//!
//! # async fn example() -> kiva_client::Result<()> {
//! let client = KivaClient::new()?;
//!
//! for action in client.recent_lending_actions().await? {
//!     let lender = action.lender.and_then(|l| l.name).and_then(FieldValue::into_typed);
//!     let sector = action.loan.and_then(|l| l.sector).and_then(FieldValue::into_typed);
//!     let (lender, sector) = (lender.unwrap_or_default(), sector.unwrap_or_default());
//!     println!("{lender} lent to a {sector} business");
//! }
//!
//! let loans = client.loans_for_lenders(&["tim9918"], Some(LenderLoanSort::Newest), None).await?;
//! println!("{} loans", loans.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Offline Use
//!
//! Any [`transport::Transport`] can back a client. Tests and demos replay recorded bodies
//! with [`transport::FixtureTransport`]:
//!
//! ```
//! use kiva_client::{KivaClient, hydrate::TypedField, transport::FixtureTransport};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> kiva_client::Result<()> {
//! let fixtures = FixtureTransport::new().with_fixture(
//!     "/releases/api/current.json",
//!     r#"{"release": {"id": "13775", "date": "2009-03-19T01:20:37Z"}}"#,
//! );
//!
//! let release = KivaClient::with_transport(fixtures).current_release().await?;
//! assert_eq!(release.id.typed_str(), Some("13775"));
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T, KivaError>`](error::Result). Hydration itself never
//! fails; errors come from the transport, from undecodable bodies, or from a document
//! lacking its top-level key:
//!
//! ```rust,no_run
//! use kiva_client::{KivaClient, KivaError};
//!
//! # async fn example() -> kiva_client::Result<()> {
//! let client = KivaClient::new()?;
//!
//! match client.partners(None).await {
//!     Ok(partners) => println!("{} partners", partners.len()),
//!     Err(KivaError::UnexpectedStatus { status, url }) => eprintln!("{url} answered {status}"),
//!     Err(KivaError::MissingKey(key)) => eprintln!("response had no `{key}`"),
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod hydrate;
pub mod models;
pub mod transport;

pub use client::KivaClient;
pub use config::ClientConfig;
pub use error::{KivaError, Result};
