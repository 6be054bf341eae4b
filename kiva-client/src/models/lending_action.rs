use serde::Serialize;

use crate::{
    hydrate::{DateValue, Field, FieldValue, Hydrate, store},
    models::{Lender, Loan},
};

/// A single lending event: one lender funding part of one loan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LendingAction {
    /// Numeric action identifier.
    pub id: Option<FieldValue<u64>>,
    /// When the loan share was purchased.
    pub date: Option<DateValue>,
    /// Who lent.
    pub lender: Option<Lender>,
    /// What was funded.
    pub loan: Option<Loan>,
}

static LENDING_ACTION_FIELDS: &[Field<LendingAction>] = &[
    Field::plain("id", |a, v| store(&mut a.id, v)),
    Field::date("date", |a, d| a.date = Some(d)),
    Field::lender("lender", |a, lender| a.lender = Some(lender)),
    Field::loan("loan", |a, loan| a.loan = Some(loan)),
];

impl Hydrate for LendingAction {
    const KIND: &'static str = "lending_action";

    fn fields() -> &'static [Field<Self>] {
        LENDING_ACTION_FIELDS
    }
}
