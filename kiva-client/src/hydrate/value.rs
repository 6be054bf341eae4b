//! Values of plain record fields.
//!
//! The web API is loose about types: ids occasionally arrive as strings, counts as floats,
//! and some labels as numbers. A plain field keeps whatever the payload carried, typed when
//! it fits and verbatim otherwise, so a record never loses data to a shape mismatch.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

/// Value of a plain record field.
///
/// Serializes untagged: a typed value as itself, a raw value as the original JSON. A
/// re-serialized record therefore reproduces the decoded payload for every plain key.
///
/// # Examples
///
/// ```
/// use kiva_client::hydrate::FieldValue;
/// use serde_json::json;
///
/// let id: FieldValue<u64> = FieldValue::decode(json!(95189));
/// assert_eq!(id.typed(), Some(&95189));
///
/// let id: FieldValue<u64> = FieldValue::decode(json!("95189"));
/// assert_eq!(id.raw(), Some(&json!("95189")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue<V> {
    /// The value deserialized into the field's type.
    Typed(V),
    /// The original JSON value, kept because it did not fit the field's type.
    Raw(Value),
}

impl<V: DeserializeOwned> FieldValue<V> {
    /// Decodes `value` as `V`, keeping it unchanged when it does not fit.
    #[must_use]
    pub fn decode(value: Value) -> Self {
        match V::deserialize(&value) {
            Ok(typed) => Self::Typed(typed),
            Err(error) => {
                debug!(%error, %value, "keeping value of unexpected shape verbatim");
                Self::Raw(value)
            }
        }
    }
}

impl<V> FieldValue<V> {
    /// Returns the typed value, if the payload fit the field's type.
    #[must_use]
    pub const fn typed(&self) -> Option<&V> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Consumes the value, returning the typed variant only.
    #[must_use]
    pub fn into_typed(self) -> Option<V> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw value kept after a type mismatch.
    #[must_use]
    pub const fn raw(&self) -> Option<&Value> {
        match self {
            Self::Typed(_) => None,
            Self::Raw(value) => Some(value),
        }
    }

    /// Returns true when the payload fit the field's type.
    #[must_use]
    pub const fn is_typed(&self) -> bool {
        matches!(self, Self::Typed(_))
    }
}

impl FieldValue<String> {
    /// Returns the text of a typed string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.typed().map(String::as_str)
    }
}

/// Typed access through the `Option` wrapping every record field.
///
/// ```
/// use kiva_client::{
///     hydrate::{TypedField, hydrate_value},
///     models::Loan,
/// };
/// use serde_json::json;
///
/// let loan: Loan = hydrate_value(json!({"id": 95189, "sector": "Retail"}));
/// assert_eq!(loan.id.typed(), Some(&95189));
/// assert_eq!(loan.sector.typed_str(), Some("Retail"));
/// assert!(loan.name.typed().is_none());
/// ```
pub trait TypedField<V> {
    /// Returns the typed value of a set field.
    fn typed(&self) -> Option<&V>;

    /// Returns the typed value as a string slice.
    fn typed_str<'a>(&'a self) -> Option<&'a str>
    where
        V: AsRef<str> + 'a,
    {
        self.typed().map(AsRef::as_ref)
    }
}

impl<V> TypedField<V> for Option<FieldValue<V>> {
    fn typed(&self) -> Option<&V> {
        self.as_ref().and_then(FieldValue::typed)
    }
}
