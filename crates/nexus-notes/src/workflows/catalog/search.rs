use serde::Deserialize;

use super::domain::Note;

/// Browse filter: free text plus exact facet constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteQuery {
    #[serde(default, rename = "q")]
    pub text: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl NoteQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Every note written by `author`.
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.matches_text(note)
            && exact(&note.university, self.university.as_deref())
            && exact(&note.faculty, self.faculty.as_deref())
            && exact(&note.module, self.module.as_deref())
            && exact(&note.author, self.author.as_deref())
    }

    fn matches_text(&self, note: &Note) -> bool {
        let needle = match self.text.as_deref() {
            None | Some("") => return true,
            Some(text) => text.to_lowercase(),
        };

        [&note.title, &note.content, &note.university]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn exact(value: &str, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(expected) => value == expected,
    }
}

/// Keeps the notes matching `query`, preserving input order.
pub fn filter_notes(notes: &[Note], query: &NoteQuery) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| query.matches(note))
        .cloned()
        .collect()
}
