//! Domain records returned by the Kiva web API.
//!
//! Every field is optional: different endpoints return different subsets of the same
//! entity, and a field the payload omits simply stays `None`. Each record publishes its
//! field table through [`Hydrate`](crate::hydrate::Hydrate).

mod journal;
mod lender;
mod lending_action;
mod loan;
mod partner;
mod release;

pub use journal::{Comment, JournalEntry};
pub use lender::Lender;
pub use lending_action::LendingAction;
pub use loan::Loan;
pub use partner::Partner;
pub use release::{ImageTemplate, Release};
