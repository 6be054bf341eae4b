use serde::Serialize;

use crate::hydrate::{DateValue, Field, FieldValue, Hydrate, store};

/// Identifies the currently deployed web API release.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Release {
    /// Release number, usually a string (e.g. `"13775"`).
    pub id: Option<FieldValue<String>>,
    /// When the release went live.
    pub date: Option<DateValue>,
}

static RELEASE_FIELDS: &[Field<Release>] = &[
    Field::plain("id", |r, v| store(&mut r.id, v)),
    Field::date("date", |r, d| r.date = Some(d)),
];

impl Hydrate for Release {
    const KIND: &'static str = "release";

    fn fields() -> &'static [Field<Self>] {
        RELEASE_FIELDS
    }
}

/// URL pattern for building image links.
///
/// `pattern` contains `<size>` and `<id>` placeholders, e.g.
/// `http://www.kiva.org/img/<size>/<id>.jpg`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageTemplate {
    /// Template identifier, referenced by `image.template_id` on other records.
    pub id: Option<FieldValue<u64>>,
    /// URL pattern.
    pub pattern: Option<FieldValue<String>>,
}

impl ImageTemplate {
    /// Expands the pattern for an image id and size (e.g. `w80h80`, `fullsize`).
    ///
    /// # Examples
    ///
    /// ```
    /// use kiva_client::{hydrate::FieldValue, models::ImageTemplate};
    ///
    /// let template = ImageTemplate {
    ///     id: Some(FieldValue::Typed(1)),
    ///     pattern: Some(FieldValue::Typed("http://www.kiva.org/img/<size>/<id>.jpg".to_owned())),
    /// };
    /// assert_eq!(
    ///     template.url_for(288221, "w80h80").as_deref(),
    ///     Some("http://www.kiva.org/img/w80h80/288221.jpg")
    /// );
    /// ```
    #[must_use]
    pub fn url_for(&self, image_id: u64, size: &str) -> Option<String> {
        self.pattern
            .as_ref()
            .and_then(FieldValue::as_str)
            .map(|pattern| pattern.replace("<size>", size).replace("<id>", &image_id.to_string()))
    }
}

static IMAGE_TEMPLATE_FIELDS: &[Field<ImageTemplate>] = &[
    Field::plain("id", |t, v| store(&mut t.id, v)),
    Field::plain("pattern", |t, v| store(&mut t.pattern, v)),
];

impl Hydrate for ImageTemplate {
    const KIND: &'static str = "image_template";

    fn fields() -> &'static [Field<Self>] {
        IMAGE_TEMPLATE_FIELDS
    }
}
