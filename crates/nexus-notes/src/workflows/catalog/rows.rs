//! Row shapes exchanged with the hosted note table.
//!
//! Incoming rows are loosely typed; `NoteRow::into_note` is the single place where
//! missing fields receive their display defaults.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{
    or_default, Category, Note, NoteDraft, NoteId, DEFAULT_AUTHOR, DEFAULT_FACULTY,
    DEFAULT_MODULE, DEFAULT_TITLE, DEFAULT_UNIVERSITY,
};

#[derive(Debug, Clone, Deserialize)]
pub struct NoteRow {
    pub id: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row id must be a string or number, found {0}")]
    InvalidId(String),
}

impl NoteRow {
    pub fn into_note(self) -> Result<Note, RowError> {
        let id = match self.id {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            other => return Err(RowError::InvalidId(other.to_string())),
        };

        let tags = match self.tags {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Note {
            id: NoteId(id),
            title: or_default(self.title, DEFAULT_TITLE),
            content: self.content.unwrap_or_default(),
            author: or_default(self.author, DEFAULT_AUTHOR),
            category: self
                .category
                .as_deref()
                .map(Category::from_label)
                .unwrap_or_default(),
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
            tags,
            university: or_default(self.university, DEFAULT_UNIVERSITY),
            faculty: or_default(self.faculty, DEFAULT_FACULTY),
            module: or_default(self.module, DEFAULT_MODULE),
            file_url: self.file_url.filter(|url| !url.is_empty()),
            file_name: self.file_name.filter(|name| !name.is_empty()),
            is_verified: self.is_verified.unwrap_or(false),
        })
    }
}

/// Outgoing row for create-or-update. `id` is omitted for new notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub university: String,
    pub faculty: String,
    pub module: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

impl NoteUpsert {
    pub fn from_draft(draft: &NoteDraft, user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.persisted_id(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            author: draft.author.clone(),
            category: draft.category,
            tags: draft.tags.clone(),
            university: draft.university.clone(),
            faculty: draft.faculty.clone(),
            module: draft.module.clone(),
            file_url: draft.file_url.clone(),
            file_name: draft.file_name.clone(),
            updated_at: now,
            user_id: user_id.to_string(),
        }
    }

    /// Materializes the stored note for adapters that keep rows locally.
    pub fn into_note(
        self,
        id: NoteId,
        created_at: Option<DateTime<Utc>>,
        is_verified: bool,
    ) -> Note {
        Note {
            id,
            title: or_default(Some(self.title), DEFAULT_TITLE),
            content: self.content,
            author: or_default(Some(self.author), DEFAULT_AUTHOR),
            category: self.category,
            created_at: created_at.or(Some(self.updated_at)),
            updated_at: Some(self.updated_at),
            tags: self.tags,
            university: or_default(Some(self.university), DEFAULT_UNIVERSITY),
            faculty: or_default(Some(self.faculty), DEFAULT_FACULTY),
            module: or_default(Some(self.module), DEFAULT_MODULE),
            file_url: self.file_url,
            file_name: self.file_name,
            is_verified,
        }
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
