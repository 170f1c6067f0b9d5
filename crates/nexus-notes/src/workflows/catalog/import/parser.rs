use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::catalog::domain::{
    or_default, Category, Note, NoteId, DEFAULT_AUTHOR, DEFAULT_FACULTY, DEFAULT_MODULE,
    DEFAULT_TITLE, DEFAULT_UNIVERSITY,
};
use crate::workflows::catalog::rows::parse_timestamp;

pub(crate) fn parse_notes<R: Read>(reader: R) -> Result<Vec<Note>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut notes = Vec::new();

    for (index, record) in csv_reader.deserialize::<NoteCsvRow>().enumerate() {
        let row = record?;
        notes.push(row.into_note(index + 1));
    }

    Ok(notes)
}

#[derive(Debug, Deserialize)]
struct NoteCsvRow {
    #[serde(rename = "Id", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(rename = "Content", default)]
    content: Option<String>,
    #[serde(rename = "Author", default, deserialize_with = "empty_string_as_none")]
    author: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(rename = "Tags", default, deserialize_with = "empty_string_as_none")]
    tags: Option<String>,
    #[serde(rename = "University", default, deserialize_with = "empty_string_as_none")]
    university: Option<String>,
    #[serde(rename = "Faculty", default, deserialize_with = "empty_string_as_none")]
    faculty: Option<String>,
    #[serde(rename = "Module", default, deserialize_with = "empty_string_as_none")]
    module: Option<String>,
    #[serde(rename = "Verified", default, deserialize_with = "empty_string_as_none")]
    verified: Option<String>,
    #[serde(rename = "Created At", default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
    #[serde(rename = "Updated At", default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
}

impl NoteCsvRow {
    fn into_note(self, line: usize) -> Note {
        let tags = self
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Note {
            id: NoteId(self.id.unwrap_or_else(|| format!("csv-{line}"))),
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
            file_url: None,
            file_name: None,
            is_verified: self.verified.as_deref().map(parse_flag).unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
