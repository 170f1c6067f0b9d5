use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled Note";
pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_UNIVERSITY: &str = "Unspecified Institution";
pub const DEFAULT_FACULTY: &str = "General Studies";
pub const DEFAULT_MODULE: &str = "General";

/// Editor ids with this prefix have never been persisted.
pub const TEMPORARY_ID_PREFIX: &str = "temp-";

/// Identifier assigned by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub String);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subject area label attached to every note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    ComputerScience,
    Mathematics,
    Business,
    Arts,
    Science,
    #[default]
    General,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::ComputerScience => "Computer Science",
            Category::Mathematics => "Mathematics",
            Category::Business => "Business",
            Category::Arts => "Arts",
            Category::Science => "Science",
            Category::General => "General",
        }
    }

    /// Unknown labels fall back to `General`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Computer Science" => Category::ComputerScience,
            "Mathematics" => Category::Mathematics,
            "Business" => Category::Business,
            "Arts" => Category::Arts,
            "Science" => Category::Science,
            _ => Category::General,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

/// A shared study note as exposed to browse, editor and assistant flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub university: String,
    pub faculty: String,
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Editor state for a note that may not exist in the backend yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl NoteDraft {
    /// True when saving should create a new row rather than update one.
    pub fn is_new(&self) -> bool {
        match self.id.as_deref() {
            None => true,
            Some(id) => id.trim().is_empty() || id.starts_with(TEMPORARY_ID_PREFIX),
        }
    }

    pub fn persisted_id(&self) -> Option<NoteId> {
        if self.is_new() {
            None
        } else {
            self.id.clone().map(NoteId)
        }
    }

    /// Title, university and module are mandatory before a save.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(RequiredField::Title);
        }
        if self.university.trim().is_empty() {
            missing.push(RequiredField::University);
        }
        if self.module.trim().is_empty() {
            missing.push(RequiredField::Module);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(NoteValidationError { missing })
        }
    }

    pub fn attach_file(&mut self, upload: &UploadedFile) {
        self.file_url = Some(upload.url.clone());
        self.file_name = Some(upload.name.clone());
        if self.content.is_empty() {
            self.content = format!("Refer to the attached file: {}", upload.name);
        }
    }
}

impl From<Note> for NoteDraft {
    fn from(note: Note) -> Self {
        Self {
            id: Some(note.id.0),
            title: note.title,
            content: note.content,
            author: note.author,
            category: note.category,
            tags: note.tags,
            university: note.university,
            faculty: note.faculty,
            module: note.module,
            file_url: note.file_url,
            file_name: note.file_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    University,
    Module,
}

impl RequiredField {
    pub const fn label(self) -> &'static str {
        match self {
            RequiredField::Title => "Title",
            RequiredField::University => "University",
            RequiredField::Module => "Module",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} required.", join_fields(.missing))]
pub struct NoteValidationError {
    pub missing: Vec<RequiredField>,
}

fn join_fields(fields: &[RequiredField]) -> String {
    let labels: Vec<&str> = fields.iter().map(|field| field.label()).collect();
    match labels.as_slice() {
        [single] => format!("{single} is"),
        [first, second] => format!("{first} and {second} are"),
        [rest @ .., last] => format!("{}, and {last} are", rest.join(", ")),
        [] => "nothing is".to_string(),
    }
}

/// Public reference to an object stored for a note attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub name: String,
}

/// Non-blank text or the boundary default.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_and_missing_ids_are_new() {
        let mut draft = NoteDraft::default();
        assert!(draft.is_new());

        draft.id = Some("temp-a1b2c3".to_string());
        assert!(draft.is_new());
        assert!(draft.persisted_id().is_none());

        draft.id = Some("42".to_string());
        assert!(!draft.is_new());
        assert_eq!(draft.persisted_id(), Some(NoteId("42".to_string())));
    }

    #[test]
    fn validation_lists_every_missing_field() {
        let draft = NoteDraft {
            title: "  ".to_string(),
            faculty: "Engineering".to_string(),
            ..NoteDraft::default()
        };

        let err = draft.validate().expect_err("draft incomplete");
        assert_eq!(
            err.missing,
            vec![
                RequiredField::Title,
                RequiredField::University,
                RequiredField::Module
            ]
        );
        assert_eq!(
            err.to_string(),
            "Title, University, and Module are required."
        );

        let partial = NoteDraft {
            university: "UCT".to_string(),
            ..NoteDraft::default()
        };
        assert_eq!(
            partial.validate().expect_err("title and module missing").to_string(),
            "Title and Module are required."
        );
    }

    #[test]
    fn attaching_a_file_fills_empty_content_only() {
        let upload = UploadedFile {
            url: "https://cdn.example/uploads/x.pdf".to_string(),
            name: "lecture-3.pdf".to_string(),
        };

        let mut empty = NoteDraft::default();
        empty.attach_file(&upload);
        assert_eq!(empty.content, "Refer to the attached file: lecture-3.pdf");
        assert_eq!(empty.file_name.as_deref(), Some("lecture-3.pdf"));

        let mut written = NoteDraft {
            content: "My own summary".to_string(),
            ..NoteDraft::default()
        };
        written.attach_file(&upload);
        assert_eq!(written.content, "My own summary");
    }

    #[test]
    fn unknown_category_labels_fall_back_to_general() {
        let parsed: Category = serde_json::from_str("\"Philosophy\"").expect("parses");
        assert_eq!(parsed, Category::General);
        let cs: Category = serde_json::from_str("\"Computer Science\"").expect("parses");
        assert_eq!(cs, Category::ComputerScience);
        assert_eq!(
            serde_json::to_string(&Category::Mathematics).expect("serializes"),
            "\"Mathematics\""
        );
    }
}
