use serde::Serialize;
use serde_json::{Number, Value};

use crate::hydrate::{DateValue, Field, FieldValue, Hydrate, store, store_raw};

/// A loan request posted by a field partner on behalf of one or more borrowers.
///
/// `location`, `description`, `image`, `terms`, `borrowers` and `journal_totals` are
/// free-form objects and are kept as raw JSON. Amounts are JSON numbers, so `2675` stays an
/// integer when the record is serialized again.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Loan {
    /// Numeric loan identifier.
    pub id: Option<FieldValue<u64>>,
    /// Lifecycle status (`fundraising`, `funded`, `in_repayment`, `paid`, `defaulted`).
    pub status: Option<FieldValue<String>>,
    /// Borrower or group name.
    pub name: Option<FieldValue<String>>,
    /// When the loan was posted.
    pub posted_date: Option<DateValue>,
    /// When the loan became fully funded.
    pub funded_date: Option<DateValue>,
    /// Business activity, e.g. "Retail".
    pub activity: Option<FieldValue<String>>,
    /// Business sector, e.g. "Agriculture".
    pub sector: Option<FieldValue<String>>,
    /// What the money is for.
    #[serde(rename = "use")]
    pub use_of_funds: Option<FieldValue<String>>,
    /// Identifier of the field partner administering the loan.
    pub partner_id: Option<FieldValue<u64>>,
    /// Amount requested.
    pub loan_amount: Option<FieldValue<Number>>,
    /// Amount funded so far.
    pub funded_amount: Option<FieldValue<Number>>,
    /// Amount sitting in lenders' baskets.
    pub basket_amount: Option<FieldValue<Number>>,
    /// Number of borrowers.
    pub borrower_count: Option<FieldValue<u64>>,
    /// Borrower list (detail endpoint only).
    pub borrowers: Option<Value>,
    /// Available description languages and texts.
    pub description: Option<Value>,
    /// Image reference (`id`, `template_id`).
    pub image: Option<Value>,
    /// Country, town and geo coordinates.
    pub location: Option<Value>,
    /// Repayment terms (detail endpoint only).
    pub terms: Option<Value>,
    /// Journal entry counters (detail endpoint only).
    pub journal_totals: Option<Value>,
}

static LOAN_FIELDS: &[Field<Loan>] = &[
    Field::plain("id", |l, v| store(&mut l.id, v)),
    Field::plain("status", |l, v| store(&mut l.status, v)),
    Field::plain("name", |l, v| store(&mut l.name, v)),
    Field::date("posted_date", |l, d| l.posted_date = Some(d)),
    Field::date("funded_date", |l, d| l.funded_date = Some(d)),
    Field::plain("activity", |l, v| store(&mut l.activity, v)),
    Field::plain("sector", |l, v| store(&mut l.sector, v)),
    Field::plain("use", |l, v| store(&mut l.use_of_funds, v)),
    Field::plain("partner_id", |l, v| store(&mut l.partner_id, v)),
    Field::plain("loan_amount", |l, v| store(&mut l.loan_amount, v)),
    Field::plain("funded_amount", |l, v| store(&mut l.funded_amount, v)),
    Field::plain("basket_amount", |l, v| store(&mut l.basket_amount, v)),
    Field::plain("borrower_count", |l, v| store(&mut l.borrower_count, v)),
    Field::plain("borrowers", |l, v| store_raw(&mut l.borrowers, v)),
    Field::plain("description", |l, v| store_raw(&mut l.description, v)),
    Field::plain("image", |l, v| store_raw(&mut l.image, v)),
    Field::plain("location", |l, v| store_raw(&mut l.location, v)),
    Field::plain("terms", |l, v| store_raw(&mut l.terms, v)),
    Field::plain("journal_totals", |l, v| store_raw(&mut l.journal_totals, v)),
];

impl Hydrate for Loan {
    const KIND: &'static str = "loan";

    fn fields() -> &'static [Field<Self>] {
        LOAN_FIELDS
    }
}
