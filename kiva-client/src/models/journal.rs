use serde::Serialize;
use serde_json::Value;

use crate::hydrate::{DateValue, Field, FieldValue, Hydrate, store, store_raw};

/// A journal update posted on a loan's page.
///
/// The comments attached to an entry are not part of the journal payload. They are fetched
/// on demand with [`KivaClient::load_comments`](crate::client::KivaClient::load_comments)
/// and cached on the entry afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JournalEntry {
    /// Numeric entry identifier.
    pub id: Option<FieldValue<u64>>,
    /// Entry title.
    pub subject: Option<FieldValue<String>>,
    /// Entry text.
    pub body: Option<FieldValue<String>>,
    /// Who wrote it.
    pub author: Option<FieldValue<String>>,
    /// When it was posted.
    pub date: Option<DateValue>,
    /// True for bulk entries posted to many loans at once.
    pub bulk: Option<FieldValue<bool>>,
    /// Number of comments.
    pub comment_count: Option<FieldValue<u64>>,
    /// Number of recommendations.
    pub recommendation_count: Option<FieldValue<u64>>,
    /// Image reference, if the entry carries one.
    pub image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<Comment>>,
}

impl JournalEntry {
    /// Returns the cached comments, if they have been loaded.
    #[must_use]
    pub fn comments(&self) -> Option<&[Comment]> {
        self.comments.as_deref()
    }

    /// Replaces the cached comments.
    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comments = Some(comments);
    }

    /// Returns true when the comments have been loaded.
    #[must_use]
    pub fn has_comments_loaded(&self) -> bool {
        self.comments.is_some()
    }
}

static JOURNAL_ENTRY_FIELDS: &[Field<JournalEntry>] = &[
    Field::plain("id", |j, v| store(&mut j.id, v)),
    Field::plain("subject", |j, v| store(&mut j.subject, v)),
    Field::plain("body", |j, v| store(&mut j.body, v)),
    Field::plain("author", |j, v| store(&mut j.author, v)),
    Field::date("date", |j, d| j.date = Some(d)),
    Field::plain("bulk", |j, v| store(&mut j.bulk, v)),
    Field::plain("comment_count", |j, v| store(&mut j.comment_count, v)),
    Field::plain("recommendation_count", |j, v| store(&mut j.recommendation_count, v)),
    Field::plain("image", |j, v| store_raw(&mut j.image, v)),
];

impl Hydrate for JournalEntry {
    const KIND: &'static str = "journal_entry";

    fn fields() -> &'static [Field<Self>] {
        JOURNAL_ENTRY_FIELDS
    }
}

/// A comment left on a journal entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comment {
    /// Numeric comment identifier.
    pub id: Option<FieldValue<u64>>,
    /// Comment text.
    pub body: Option<FieldValue<String>>,
    /// Who wrote it.
    pub author: Option<FieldValue<String>>,
    /// Where the author lives.
    pub whereabouts: Option<FieldValue<String>>,
    /// When it was posted.
    pub date: Option<DateValue>,
}

static COMMENT_FIELDS: &[Field<Comment>] = &[
    Field::plain("id", |c, v| store(&mut c.id, v)),
    Field::plain("body", |c, v| store(&mut c.body, v)),
    Field::plain("author", |c, v| store(&mut c.author, v)),
    Field::plain("whereabouts", |c, v| store(&mut c.whereabouts, v)),
    Field::date("date", |c, d| c.date = Some(d)),
];

impl Hydrate for Comment {
    const KIND: &'static str = "comment";

    fn fields() -> &'static [Field<Self>] {
        COMMENT_FIELDS
    }
}
