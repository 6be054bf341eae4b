use serde::Serialize;
use serde_json::{Number, Value};

use crate::hydrate::{DateValue, Field, FieldValue, Hydrate, store, store_raw};

/// A microfinance institution that administers loans locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partner {
    /// Numeric partner identifier.
    pub id: Option<FieldValue<u64>>,
    /// Institution name.
    pub name: Option<FieldValue<String>>,
    /// Partnership status (`active`, `paused`, `closed`).
    pub status: Option<FieldValue<String>>,
    /// Risk rating; may be a number or a label such as "Not Rated".
    pub rating: Option<Value>,
    /// When the partnership started.
    pub start_date: Option<DateValue>,
    /// Delinquency rate in percent.
    pub delinquency_rate: Option<FieldValue<Number>>,
    /// Default rate in percent.
    pub default_rate: Option<FieldValue<Number>>,
    /// Total amount raised through Kiva.
    pub total_amount_raised: Option<FieldValue<Number>>,
    /// Number of loans posted.
    pub loans_posted: Option<FieldValue<u64>>,
    /// Countries the partner operates in.
    pub countries: Option<Value>,
    /// Image reference (`id`, `template_id`).
    pub image: Option<Value>,
}

static PARTNER_FIELDS: &[Field<Partner>] = &[
    Field::plain("id", |p, v| store(&mut p.id, v)),
    Field::plain("name", |p, v| store(&mut p.name, v)),
    Field::plain("status", |p, v| store(&mut p.status, v)),
    Field::plain("rating", |p, v| store_raw(&mut p.rating, v)),
    Field::date("start_date", |p, d| p.start_date = Some(d)),
    Field::plain("delinquency_rate", |p, v| store(&mut p.delinquency_rate, v)),
    Field::plain("default_rate", |p, v| store(&mut p.default_rate, v)),
    Field::plain("total_amount_raised", |p, v| store(&mut p.total_amount_raised, v)),
    Field::plain("loans_posted", |p, v| store(&mut p.loans_posted, v)),
    Field::plain("countries", |p, v| store_raw(&mut p.countries, v)),
    Field::plain("image", |p, v| store_raw(&mut p.image, v)),
];

impl Hydrate for Partner {
    const KIND: &'static str = "partner";

    fn fields() -> &'static [Field<Self>] {
        PARTNER_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::hydrate::{TypedField, hydrate_value};

    #[test]
    fn test_partner_fields() {
        let partner: Partner = hydrate_value(json!({
            "id": 1,
            "name": "East Africa Beta",
            "status": "closed",
            "rating": 0,
            "start_date": "2005-04-15T17:00:00Z",
            "delinquency_rate": 0,
            "default_rate": 9.1917293233083,
            "total_amount_raised": 26600,
            "loans_posted": 133,
            "countries": [
                {"iso_code": "UG", "name": "Uganda"},
                {"iso_code": "KE", "name": "Kenya"},
                {"iso_code": "TZ", "name": "Tanzania"}
            ]
        }));

        assert_eq!(partner.id.typed(), Some(&1));
        assert_eq!(partner.status.typed_str(), Some("closed"));
        assert_eq!(partner.default_rate.typed().and_then(Number::as_f64), Some(9.1917293233083));
        assert_eq!(partner.delinquency_rate.typed(), Some(&Number::from(0_u64)));
        assert_eq!(partner.loans_posted.typed(), Some(&133));
        assert_eq!(partner.countries.as_ref().and_then(Value::as_array).map(Vec::len), Some(3));
        assert!(partner.start_date.as_ref().is_some_and(DateValue::is_parsed));
        assert!(partner.image.is_none());
    }

    #[test]
    fn test_partner_textual_rating() {
        let partner: Partner = hydrate_value(json!({"rating": "Not Rated"}));
        assert_eq!(partner.rating, Some(json!("Not Rated")));
    }
}
