mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::catalog::domain::Note;

#[derive(Debug)]
pub enum NoteImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for NoteImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteImportError::Io(err) => write!(f, "failed to read note export: {}", err),
            NoteImportError::Csv(err) => write!(f, "invalid note CSV data: {}", err),
        }
    }
}

impl std::error::Error for NoteImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NoteImportError::Io(err) => Some(err),
            NoteImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for NoteImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for NoteImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a note export so facets and search can run without the hosted backend.
pub struct NoteCsvImporter;

impl NoteCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Note>, NoteImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Note>, NoteImportError> {
        Ok(parser::parse_notes(reader)?)
    }
}
