//! Table-driven hydration of decoded JSON objects into domain records.
//!
//! Every record type implements [`Hydrate`] by publishing a static table of [`Field`]s.
//! Each entry names a JSON key and tags how its value is treated:
//!
//! | Kind                          | Treatment                                         |
//! |-------------------------------|---------------------------------------------------|
//! | [`FieldKind::Plain`]          | typed when it fits, kept verbatim otherwise       |
//! | [`FieldKind::Date`]           | string parsed into a timestamp, raw on failure    |
//! | [`FieldKind::NestedLoan`]     | object hydrated recursively into a [`Loan`]       |
//! | [`FieldKind::NestedLender`]   | object hydrated recursively into a [`Lender`]     |
//!
//! Keys missing from the table are ignored, so new API fields never break decoding.
//! Hydration never fails: a value that does not fit its slot's type is kept as
//! [`FieldValue::Raw`], so every known key ends up holding exactly what the payload carried.
//!
//! # Examples
//!
//! ```
//! use kiva_client::{
//!     hydrate::{TypedField, hydrate_value},
//!     models::LendingAction,
//! };
//! use serde_json::json;
//!
//! let action: LendingAction = hydrate_value(json!({
//!     "id": 11661649,
//!     "lender": {"name": "Ruth"},
//!     "loan": {"sector": "Agriculture"},
//!     "bogus_field": 42
//! }));
//!
//! assert_eq!(action.id.typed(), Some(&11661649));
//! assert_eq!(action.lender.unwrap().name.typed_str(), Some("Ruth"));
//! assert_eq!(action.loan.unwrap().sector.typed_str(), Some("Agriculture"));
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    error::{KivaError, Result},
    models::{Lender, Loan},
};

pub mod date;
mod value;

pub use date::{DateValue, parse_timestamp};
pub use value::{FieldValue, TypedField};

/// A record type that can be populated from a decoded JSON object.
pub trait Hydrate: Default + Sized + 'static {
    /// Record name used in log events.
    const KIND: &'static str;

    /// Returns the table of JSON keys this record accepts.
    fn fields() -> &'static [Field<Self>];
}

/// How the value of a known key is assigned to a record.
pub enum FieldKind<T> {
    /// Store the value with [`store`] or [`store_raw`].
    Plain(fn(&mut T, Value)),
    /// Coerce the value with [`date::coerce`] before assigning it.
    Date(fn(&mut T, DateValue)),
    /// Hydrate the nested object as a [`Loan`].
    NestedLoan(fn(&mut T, Loan)),
    /// Hydrate the nested object as a [`Lender`].
    NestedLender(fn(&mut T, Lender)),
}

impl<T> FieldKind<T> {
    /// Short name of the treatment, for diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain(_) => "plain",
            Self::Date(_) => "date",
            Self::NestedLoan(_) => "nested_loan",
            Self::NestedLender(_) => "nested_lender",
        }
    }
}

impl<T> fmt::Debug for FieldKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a record's field table.
#[derive(Debug)]
pub struct Field<T> {
    name: &'static str,
    kind: FieldKind<T>,
}

impl<T> Field<T> {
    /// A field whose value is stored as decoded.
    pub const fn plain(name: &'static str, set: fn(&mut T, Value)) -> Self {
        Self { name, kind: FieldKind::Plain(set) }
    }

    /// A field whose string value is parsed as a timestamp.
    pub const fn date(name: &'static str, set: fn(&mut T, DateValue)) -> Self {
        Self { name, kind: FieldKind::Date(set) }
    }

    /// A field embedding a loan object.
    pub const fn loan(name: &'static str, set: fn(&mut T, Loan)) -> Self {
        Self { name, kind: FieldKind::NestedLoan(set) }
    }

    /// A field embedding a lender object.
    pub const fn lender(name: &'static str, set: fn(&mut T, Lender)) -> Self {
        Self { name, kind: FieldKind::NestedLender(set) }
    }

    /// JSON key this entry matches.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Treatment applied to the value.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind<T> {
        &self.kind
    }

    fn assign(&self, record: &mut T, value: Value) {
        match self.kind {
            FieldKind::NestedLoan(set) => {
                if let Some(fields) = nested_object(self.name, value) {
                    set(record, hydrate::<Loan>(fields));
                }
            }
            FieldKind::NestedLender(set) => {
                if let Some(fields) = nested_object(self.name, value) {
                    set(record, hydrate::<Lender>(fields));
                }
            }
            FieldKind::Date(set) => {
                if !value.is_null() {
                    set(record, date::coerce(value));
                }
            }
            FieldKind::Plain(set) => set(record, value),
        }
    }
}

/// Stores a decoded value into a typed slot, see [`FieldValue::decode`].
///
/// JSON `null` resets the slot to `None`.
pub fn store<V: DeserializeOwned>(slot: &mut Option<FieldValue<V>>, value: Value) {
    *slot = (!value.is_null()).then(|| FieldValue::decode(value));
}

/// Stores a free-form value unchanged.
///
/// JSON `null` resets the slot to `None`.
pub fn store_raw(slot: &mut Option<Value>, value: Value) {
    *slot = (!value.is_null()).then_some(value);
}

fn nested_object(field: &str, value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(fields) => Some(fields),
        Value::Null => None,
        other => {
            debug!(field, value = %other, "expected a nested object, skipping");
            None
        }
    }
}

/// Builds a record of type `T` from one decoded JSON object.
///
/// Keys are visited in decoder order; each known key is assigned according to its
/// [`FieldKind`], unknown keys are skipped.
#[must_use]
pub fn hydrate<T: Hydrate>(fields: Map<String, Value>) -> T {
    let table = T::fields();
    let mut record = T::default();

    for (key, value) in fields {
        match table.iter().find(|field| field.name == key) {
            Some(field) => field.assign(&mut record, value),
            None => trace!(record = T::KIND, key = %key, "ignoring unknown field"),
        }
    }

    record
}

/// Builds a record from any JSON value.
///
/// Non-object values produce `T::default()`.
#[must_use]
pub fn hydrate_value<T: Hydrate>(value: Value) -> T {
    match value {
        Value::Object(fields) => hydrate(fields),
        other => {
            debug!(record = T::KIND, value = %other, "expected an object, using empty record");
            T::default()
        }
    }
}

/// Hydrates every element of `items`, preserving order and count.
#[must_use]
pub fn populate_all<T: Hydrate>(items: Vec<Value>) -> Vec<T> {
    items.into_iter().map(hydrate_value).collect()
}

/// Populates the array stored under a top-level key of a response document.
///
/// # Errors
///
/// Returns [`KivaError::MissingKey`] when `key` is absent or does not hold an array.
pub fn populate_from<T: Hydrate>(document: Value, key: &str) -> Result<Vec<T>> {
    match take_key(document, key)? {
        Value::Array(items) => {
            debug!(record = T::KIND, key, count = items.len(), "populating records");
            Ok(populate_all(items))
        }
        _ => Err(KivaError::MissingKey(key.to_owned())),
    }
}

/// Hydrates the single object stored under a top-level key of a response document.
///
/// # Errors
///
/// Returns [`KivaError::MissingKey`] when `key` is absent or does not hold an object.
pub fn hydrate_from<T: Hydrate>(document: Value, key: &str) -> Result<T> {
    match take_key(document, key)? {
        Value::Object(fields) => Ok(hydrate(fields)),
        _ => Err(KivaError::MissingKey(key.to_owned())),
    }
}

fn take_key(document: Value, key: &str) -> Result<Value> {
    match document {
        Value::Object(mut root) => {
            root.remove(key).ok_or_else(|| KivaError::MissingKey(key.to_owned()))
        }
        _ => Err(KivaError::MissingKey(key.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Number, json};

    use super::*;
    use crate::models::{Comment, ImageTemplate, JournalEntry, LendingAction, Partner, Release};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_hydrate_loan_scenario() {
        let loan: Loan = hydrate(object(json!({
            "id": 95189,
            "status": "funded",
            "posted_date": "2009-03-19T02:10:07Z",
            "sector": "Retail"
        })));

        assert_eq!(loan.id.typed(), Some(&95189));
        assert_eq!(loan.status.typed_str(), Some("funded"));
        assert_eq!(loan.sector.typed_str(), Some("Retail"));
        let expected = parse_timestamp("Thu Mar 19 02:10:07 UTC 2009").unwrap();
        assert_eq!(loan.posted_date, Some(DateValue::Parsed(expected)));
    }

    #[test]
    fn test_hydrate_lending_action_scenario() {
        let action: LendingAction = hydrate(object(json!({
            "id": 11661649,
            "lender": {"name": "Ruth"},
            "loan": {"sector": "Agriculture"}
        })));

        assert_eq!(action.id.typed(), Some(&11661649));
        assert_eq!(action.lender.as_ref().and_then(|l| l.name.typed_str()), Some("Ruth"));
        assert_eq!(action.loan.as_ref().and_then(|l| l.sector.typed_str()), Some("Agriculture"));
    }

    #[test]
    fn test_nested_records_follow_the_same_rules() {
        let action: LendingAction = hydrate(object(json!({
            "date": "2009-03-19T02:15:00Z",
            "lender": {"uid": "tim9918", "member_since": "2007-04-09T16:37:58Z", "bogus": 1},
            "loan": {"id": 95189, "funded_date": "never", "location": {"country": "Tajikistan"}}
        })));

        assert!(action.date.as_ref().is_some_and(DateValue::is_parsed));
        let lender = action.lender.unwrap();
        assert_eq!(lender.uid(), Some("tim9918"));
        assert!(lender.member_since.as_ref().is_some_and(DateValue::is_parsed));
        let loan = action.loan.unwrap();
        assert_eq!(loan.id.typed(), Some(&95189));
        assert_eq!(loan.funded_date, Some(DateValue::Raw(json!("never"))));
        assert_eq!(loan.location, Some(json!({"country": "Tajikistan"})));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let loan: Loan = hydrate(object(json!({"bogus_field": 42})));
        assert_eq!(loan, Loan::default());

        let partner: Partner = hydrate(object(json!({"bogus_field": 42})));
        assert_eq!(partner, Partner::default());

        let release: Release = hydrate(object(json!({"bogus_field": 42})));
        assert_eq!(release, Release::default());
    }

    #[test]
    fn test_missing_fields_stay_unset() {
        let comment: Comment = hydrate(object(json!({"author": "Janet and Marty"})));
        assert_eq!(comment.author.typed_str(), Some("Janet and Marty"));
        assert!(comment.id.is_none());
        assert!(comment.body.is_none());
        assert!(comment.date.is_none());
        assert!(comment.whereabouts.is_none());
    }

    #[test]
    fn test_mismatched_value_is_kept_verbatim() {
        let loan: Loan = hydrate(object(json!({
            "id": "95189",
            "name": "Saboat Artykova",
            "partner_id": -1,
            "loan_amount": 2675,
            "funded_amount": 2675.5
        })));

        assert_eq!(loan.id, Some(FieldValue::Raw(json!("95189"))));
        assert_eq!(loan.partner_id, Some(FieldValue::Raw(json!(-1))));
        assert_eq!(loan.name.typed_str(), Some("Saboat Artykova"));
        assert_eq!(loan.loan_amount.typed().and_then(Number::as_u64), Some(2675));
        assert_eq!(loan.funded_amount.typed().and_then(Number::as_f64), Some(2675.5));

        let value = serde_json::to_value(&loan).unwrap();
        assert_eq!(value["id"], json!("95189"));
        assert_eq!(value["partner_id"], json!(-1));
        assert_eq!(value["loan_amount"], json!(2675));
    }

    #[test]
    fn test_numeric_release_id_is_kept() {
        let release: Release = hydrate(object(json!({"id": 13775})));
        assert_eq!(release.id, Some(FieldValue::Raw(json!(13775))));
        assert!(release.id.typed().is_none());
    }

    #[test]
    fn test_null_leaves_field_unset() {
        let entry: JournalEntry = hydrate(object(json!({
            "id": null,
            "date": null,
            "subject": "Update"
        })));

        assert!(entry.id.is_none());
        assert!(entry.date.is_none());
        assert_eq!(entry.subject.typed_str(), Some("Update"));
    }

    #[test]
    fn test_nested_field_with_non_object_is_skipped() {
        let action: LendingAction = hydrate(object(json!({
            "id": 1,
            "lender": "Ruth",
            "loan": null
        })));

        assert_eq!(action.id.typed(), Some(&1));
        assert!(action.lender.is_none());
        assert!(action.loan.is_none());
    }

    #[test]
    fn test_opaque_values_pass_through() {
        let loan: Loan = hydrate(object(json!({
            "description": {"languages": ["ru", "en"]},
            "image": {"template_id": 1, "id": 288221},
            "borrowers": [{"first_name": "Saboat", "gender": "F"}]
        })));

        assert_eq!(loan.description, Some(json!({"languages": ["ru", "en"]})));
        assert_eq!(loan.image, Some(json!({"template_id": 1, "id": 288221})));
        assert_eq!(loan.borrowers, Some(json!([{"first_name": "Saboat", "gender": "F"}])));
    }

    #[test]
    fn test_hydrate_value_non_object_yields_default() {
        let template: ImageTemplate = hydrate_value(json!([1, 2, 3]));
        assert_eq!(template, ImageTemplate::default());
    }

    #[test]
    fn test_populate_all_preserves_order_and_count() {
        assert!(populate_all::<Partner>(Vec::new()).is_empty());

        let partners: Vec<Partner> = populate_all(vec![
            json!({"id": 128}),
            json!("not an object"),
            json!({"id": 1, "status": "closed"}),
        ]);

        assert_eq!(partners.len(), 3);
        assert_eq!(partners[0].id.typed(), Some(&128));
        assert_eq!(partners[1], Partner::default());
        assert_eq!(partners[2].id.typed(), Some(&1));
        assert_eq!(partners[2].status.typed_str(), Some("closed"));
    }

    #[test]
    fn test_populate_many_partners() {
        let items: Vec<Value> =
            (0..109).map(|i| json!({"id": i, "name": format!("p{i}")})).collect();
        let partners: Vec<Partner> = populate_all(items);

        assert_eq!(partners.len(), 109);
        for (index, partner) in partners.iter().enumerate() {
            assert_eq!(partner.id.typed(), Some(&(index as u64)));
            assert_eq!(partner.name, Some(FieldValue::Typed(format!("p{index}"))));
        }
    }

    #[test]
    fn test_populate_from_top_level_key() {
        let document = json!({
            "paging": {"page": 1, "total": 2},
            "templates": [{"id": 1, "pattern": "http://www.kiva.org/img/<size>/<id>.jpg"}]
        });

        let templates: Vec<ImageTemplate> = populate_from(document, "templates").unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(
            templates[0].pattern.typed_str(),
            Some("http://www.kiva.org/img/<size>/<id>.jpg")
        );
    }

    #[test]
    fn test_populate_from_missing_key() {
        let result = populate_from::<Loan>(json!({"lenders": []}), "loans");
        assert!(matches!(result, Err(KivaError::MissingKey(key)) if key == "loans"));

        let result = populate_from::<Loan>(json!({"loans": {"id": 1}}), "loans");
        assert!(matches!(result, Err(KivaError::MissingKey(_))));

        let result = populate_from::<Loan>(json!([]), "loans");
        assert!(matches!(result, Err(KivaError::MissingKey(_))));
    }

    #[test]
    fn test_hydrate_from_singleton() {
        let release: Release = hydrate_from(
            json!({"release": {"id": "13775", "date": "Thu Mar 19 01:20:37 UTC 2009"}}),
            "release",
        )
        .unwrap();

        assert_eq!(release.id.typed_str(), Some("13775"));
        assert_eq!(
            release.date.and_then(|d| d.timestamp().copied()),
            parse_timestamp("2009-03-19T01:20:37Z")
        );

        let result = hydrate_from::<Release>(json!({"release": []}), "release");
        assert!(matches!(result, Err(KivaError::MissingKey(_))));
    }

    #[test]
    fn test_hydrating_twice_is_value_equal() {
        let source = json!({
            "id": 16958,
            "author": "Janet and Marty",
            "body": "Dear Dona Isabel,\r\n\r\n",
            "date": "2007-07-18T16:52:53Z",
            "whereabouts": "San Francisco, California, USA"
        });

        let first: Comment = hydrate_value(source.clone());
        let second: Comment = hydrate_value(source);
        assert_eq!(first, second);
    }

    #[test]
    fn test_field_kind_debug() {
        let kinds: Vec<String> =
            LendingAction::fields().iter().map(|f| format!("{:?}", f.kind())).collect();
        assert!(kinds.contains(&"nested_loan".to_owned()));
        assert!(kinds.contains(&"nested_lender".to_owned()));
        assert!(kinds.contains(&"date".to_owned()));
    }
}
