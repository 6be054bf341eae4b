//! Property tests for the hydrator and collection populator.

use kiva_client::{
    hydrate::{DateValue, FieldKind, Hydrate, TypedField, hydrate, hydrate_value, populate_all},
    models::{Comment, JournalEntry, Lender, LendingAction, Loan, Partner, Release},
};
use proptest::{prelude::*, test_runner::TestCaseError};
use serde::Serialize;
use serde_json::{Map, Value, json};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_filter("finite", |f| f.is_finite()).prop_map(Value::from),
        "[a-zA-Z0-9 :+-]{0,24}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("id".to_owned()),
                    Just("date".to_owned()),
                    Just("loan".to_owned()),
                    Just("lender".to_owned()),
                    Just("name".to_owned()),
                    Just("posted_date".to_owned()),
                    Just("member_since".to_owned()),
                    "[a-z_]{1,12}",
                ],
                inner,
                0..8,
            )
            .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn plain_keys<T: Hydrate>() -> Vec<&'static str> {
    T::fields()
        .iter()
        .filter(|field| matches!(field.kind(), FieldKind::Plain(_)))
        .map(|field| field.name())
        .collect()
}

/// Hydrates `{key: value}` and checks the record serializes `key` back to `value`.
fn check_plain_value_kept<T: Hydrate + Serialize>(
    key: &str,
    value: &Value,
) -> Result<(), TestCaseError> {
    let record: T = hydrate(Map::from_iter([(key.to_owned(), value.clone())]));
    let serialized = serde_json::to_value(&record)
        .map_err(|error| TestCaseError::fail(error.to_string()))?;
    prop_assert_eq!(&serialized[key], value, "{}", key);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_hydration_accepts_any_json(value in arb_json()) {
        let _action: LendingAction = hydrate_value(value.clone());
        let _loan: Loan = hydrate_value(value.clone());
        let _partner: Partner = hydrate_value(value);
    }

    #[test]
    fn test_populate_preserves_count_and_order(ids in prop::collection::vec(any::<u32>(), 0..50)) {
        let items: Vec<Value> =
            ids.iter().map(|id| json!({"id": id, "sector": "Retail"})).collect();

        let loans: Vec<Loan> = populate_all(items);

        prop_assert_eq!(loans.len(), ids.len());
        for (loan, id) in loans.iter().zip(&ids) {
            prop_assert_eq!(loan.id.typed().copied(), Some(u64::from(*id)));
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored(
        extra in prop::collection::btree_map("zz_[a-z]{1,10}", arb_json(), 0..6),
    ) {
        let base = json!({
            "id": 95189,
            "name": "Saboat Artykova",
            "posted_date": "2009-03-19T02:10:07Z",
        });
        let Value::Object(mut with_extra) = base.clone() else { unreachable!() };
        with_extra.extend(extra);

        let plain: Loan = hydrate_value(base);
        let noisy: Loan = hydrate_value(Value::Object(with_extra));
        prop_assert_eq!(plain, noisy);
    }

    #[test]
    fn test_plain_fields_hold_the_decoded_value(
        loan_key in prop::sample::select(plain_keys::<Loan>()),
        lender_key in prop::sample::select(plain_keys::<Lender>()),
        partner_key in prop::sample::select(plain_keys::<Partner>()),
        value in arb_json(),
    ) {
        check_plain_value_kept::<Loan>(loan_key, &value)?;
        check_plain_value_kept::<Lender>(lender_key, &value)?;
        check_plain_value_kept::<Partner>(partner_key, &value)?;
        check_plain_value_kept::<JournalEntry>("id", &value)?;
        check_plain_value_kept::<Comment>("author", &value)?;
        check_plain_value_kept::<Release>("id", &value)?;
    }

    #[test]
    fn test_date_strings_are_never_lost(text in "\\PC{0,32}") {
        let loan: Loan = hydrate_value(json!({"posted_date": text.clone()}));

        match loan.posted_date {
            Some(DateValue::Parsed(_)) => {}
            Some(DateValue::Raw(raw)) => prop_assert_eq!(raw, Value::String(text)),
            None => prop_assert!(false, "date field left unset"),
        }
    }

    #[test]
    fn test_hydration_is_deterministic(value in arb_json()) {
        let fields = match value {
            Value::Object(map) => map,
            other => Map::from_iter([("loan".to_owned(), other)]),
        };

        let first: LendingAction = hydrate_value(Value::Object(fields.clone()));
        let second: LendingAction = hydrate_value(Value::Object(fields));
        prop_assert_eq!(first, second);
    }
}
