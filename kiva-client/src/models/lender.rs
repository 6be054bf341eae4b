use serde::Serialize;
use serde_json::Value;

use crate::hydrate::{DateValue, Field, FieldValue, Hydrate, store, store_raw};

/// A Kiva member who lends money.
///
/// `uid` is the public, URL-safe handle (e.g. `tim9918`); it is what the lender endpoints
/// expect, unlike the numeric ids used elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lender {
    /// Public handle used in URLs.
    pub uid: Option<FieldValue<String>>,
    /// Lender id as shown on the web site.
    pub lender_id: Option<FieldValue<String>>,
    /// Display name.
    pub name: Option<FieldValue<String>>,
    /// Where the lender lives.
    pub whereabouts: Option<FieldValue<String>>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<FieldValue<String>>,
    /// Number of loans made.
    pub loan_count: Option<FieldValue<u64>>,
    /// Number of people invited to Kiva.
    pub invitee_count: Option<FieldValue<u64>>,
    /// Occupation.
    pub occupation: Option<FieldValue<String>>,
    /// Additional occupational information.
    pub occupational_info: Option<FieldValue<String>>,
    /// Free-text answer to "I loan because".
    pub loan_because: Option<FieldValue<String>>,
    /// Personal web site.
    pub personal_url: Option<FieldValue<String>>,
    /// Image reference (`id`, `template_id`).
    pub image: Option<Value>,
    /// Membership start.
    pub member_since: Option<DateValue>,
}

impl Lender {
    /// Returns the identifier the lender endpoints accept.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_ref().and_then(FieldValue::as_str)
    }
}

static LENDER_FIELDS: &[Field<Lender>] = &[
    Field::plain("uid", |l, v| store(&mut l.uid, v)),
    Field::plain("lender_id", |l, v| store(&mut l.lender_id, v)),
    Field::plain("name", |l, v| store(&mut l.name, v)),
    Field::plain("whereabouts", |l, v| store(&mut l.whereabouts, v)),
    Field::plain("country_code", |l, v| store(&mut l.country_code, v)),
    Field::plain("loan_count", |l, v| store(&mut l.loan_count, v)),
    Field::plain("invitee_count", |l, v| store(&mut l.invitee_count, v)),
    Field::plain("occupation", |l, v| store(&mut l.occupation, v)),
    Field::plain("occupational_info", |l, v| store(&mut l.occupational_info, v)),
    Field::plain("loan_because", |l, v| store(&mut l.loan_because, v)),
    Field::plain("personal_url", |l, v| store(&mut l.personal_url, v)),
    Field::plain("image", |l, v| store_raw(&mut l.image, v)),
    Field::date("member_since", |l, d| l.member_since = Some(d)),
];

impl Hydrate for Lender {
    const KIND: &'static str = "lender";

    fn fields() -> &'static [Field<Self>] {
        LENDER_FIELDS
    }
}
