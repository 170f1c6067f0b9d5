//! Editable list of subject marks behind the APS calculator and career consultation.

use serde::{Deserialize, Deserializer, Serialize};

use super::scoring::{mark_value, parse_mark, score_breakdown, total_score, ScoreBreakdown, ScoredSubject};

/// Entries are never removed below this count.
pub const MIN_ENTRIES: usize = 3;

/// Subjects every fresh session starts with, marks blank.
pub const PLACEHOLDER_SUBJECTS: [&str; MIN_ENTRIES] = ["English", "Mathematics", "Life Orientation"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

/// One row of the calculator exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectEntry {
    pub id: EntryId,
    pub name: String,
    pub mark: String,
}

impl ScoredSubject for SubjectEntry {
    fn subject(&self) -> &str {
        &self.name
    }

    fn mark(&self) -> i64 {
        mark_value(&self.mark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Name,
    Mark,
}

/// A validated subject ready to be sent for consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectMark {
    pub name: String,
    pub mark: i64,
}

impl ScoredSubject for SubjectMark {
    fn subject(&self) -> &str {
        &self.name
    }

    fn mark(&self) -> i64 {
        self.mark
    }
}

/// Wire shape of a subject; the mark may arrive as text, a number or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubjectInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "mark_as_text")]
    pub mark: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MarkInput {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

fn mark_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<MarkInput>::deserialize(deserializer)? {
        None => String::new(),
        Some(MarkInput::Text(text)) => text,
        Some(MarkInput::Integer(value)) => value.to_string(),
        Some(MarkInput::Decimal(value)) => value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("subject {position} has no name")]
    UnnamedSubject { position: usize },
    #[error("{subject} has no mark")]
    MissingMark { subject: String },
    #[error("{subject} has an invalid mark '{raw}'")]
    InvalidMark { subject: String, raw: String },
}

/// Caller-owned calculator state. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionSession {
    entries: Vec<SubjectEntry>,
    next_id: u64,
}

impl Default for AdmissionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionSession {
    /// Starts with the placeholder subjects and blank marks.
    pub fn new() -> Self {
        Self::with_entries(
            PLACEHOLDER_SUBJECTS
                .iter()
                .map(|name| (name.to_string(), String::new())),
        )
    }

    pub fn with_entries<I, N, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, M)>,
        N: Into<String>,
        M: Into<String>,
    {
        let mut session = Self {
            entries: Vec::new(),
            next_id: 1,
        };
        for (name, mark) in entries {
            let id = session.allocate_id();
            session.entries.push(SubjectEntry {
                id,
                name: name.into(),
                mark: mark.into(),
            });
        }
        session
    }

    pub fn from_inputs(inputs: Vec<SubjectInput>) -> Self {
        Self::with_entries(inputs.into_iter().map(|input| (input.name, input.mark)))
    }

    pub fn entries(&self) -> &[SubjectEntry] {
        &self.entries
    }

    /// Appends a blank row and returns its id.
    pub fn add_entry(&mut self) -> EntryId {
        let id = self.allocate_id();
        self.entries.push(SubjectEntry {
            id,
            name: String::new(),
            mark: String::new(),
        });
        id
    }

    /// Returns `false` when no entry has `id`.
    pub fn update_entry(&mut self, id: EntryId, field: EntryField, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                match field {
                    EntryField::Name => entry.name = value.into(),
                    EntryField::Mark => entry.mark = value.into(),
                }
                true
            }
            None => false,
        }
    }

    /// Removes `id` unless that would leave fewer than [`MIN_ENTRIES`] rows.
    pub fn remove_entry(&mut self, id: EntryId) -> bool {
        if self.entries.len() <= MIN_ENTRIES {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Running APS; incomplete marks count as 0.
    pub fn total_score(&self) -> u32 {
        total_score(&self.entries)
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        score_breakdown(&self.entries)
    }

    /// Every subject must be named and carry a mark whose leading integer is non-negative,
    /// read the same way the running total reads it.
    pub fn consultation_marks(&self) -> Result<Vec<SubjectMark>, SessionError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let name = entry.name.trim();
                if name.is_empty() {
                    return Err(SessionError::UnnamedSubject {
                        position: index + 1,
                    });
                }

                let raw = entry.mark.trim();
                if raw.is_empty() {
                    return Err(SessionError::MissingMark {
                        subject: name.to_string(),
                    });
                }

                match parse_mark(raw) {
                    Some(mark) if mark >= 0 => Ok(SubjectMark {
                        name: name.to_string(),
                        mark,
                    }),
                    _ => Err(SessionError::InvalidMark {
                        subject: name.to_string(),
                        raw: raw.to_string(),
                    }),
                }
            })
            .collect()
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }
}
