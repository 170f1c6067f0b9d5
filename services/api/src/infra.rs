use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use nexus_notes::workflows::catalog::rows::NoteUpsert;
use nexus_notes::workflows::catalog::{FileStore, Note, NoteId, NoteRepository, RepositoryError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog used when no hosted backend is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNoteRepository {
    notes: Arc<Mutex<HashMap<NoteId, Note>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryNoteRepository {
    pub(crate) fn seeded(notes: Vec<Note>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.notes.lock().expect("repository mutex poisoned");
            for note in notes {
                guard.insert(note.id.clone(), note);
            }
        }
        repository
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let guard = self.notes.lock().expect("repository mutex poisoned");
        let mut notes: Vec<Note> = guard.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notes)
    }

    async fn fetch(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        let guard = self.notes.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    async fn upsert(&self, row: NoteUpsert) -> Result<Note, RepositoryError> {
        let mut guard = self.notes.lock().expect("repository mutex poisoned");
        let id = match row.id.clone() {
            Some(id) => {
                if !guard.contains_key(&id) {
                    return Err(RepositoryError::NotFound);
                }
                id
            }
            None => NoteId(format!(
                "mem-{}",
                self.sequence.fetch_add(1, Ordering::Relaxed) + 1
            )),
        };

        let (created_at, is_verified) = guard
            .get(&id)
            .map(|note| (note.created_at, note.is_verified))
            .unwrap_or((None, false));
        let note = row.into_note(id.clone(), created_at, is_verified);
        guard.insert(id, note.clone());
        Ok(note)
    }

    async fn set_verified(&self, id: &NoteId, verified: bool) -> Result<(), RepositoryError> {
        let mut guard = self.notes.lock().expect("repository mutex poisoned");
        match guard.get_mut(id) {
            Some(note) => {
                note.is_verified = verified;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError> {
        let mut guard = self.notes.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredObject {
    pub(crate) path: String,
    pub(crate) content_type: String,
    pub(crate) size: usize,
}

/// Keeps attachment metadata only; bytes are dropped after sizing.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFileStore {
    objects: Arc<Mutex<Vec<StoredObject>>>,
}

impl InMemoryFileStore {
    pub(crate) fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().expect("file store mutex poisoned").clone()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RepositoryError> {
        let mut guard = self.objects.lock().expect("file store mutex poisoned");
        guard.push(StoredObject {
            path: path.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        });
        Ok(format!("memory://note-files/{path}"))
    }
}

/// Parses `NAME=MARK` pairs given on the command line. The mark is kept as typed.
pub(crate) fn parse_subject(raw: &str) -> Result<(String, String), String> {
    let (name, mark) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MARK, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("subject name missing in '{raw}'"));
    }
    Ok((name.to_string(), mark.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_parse_from_name_mark_pairs() {
        assert_eq!(
            parse_subject("Physical Sciences=74"),
            Ok(("Physical Sciences".to_string(), "74".to_string()))
        );
        assert_eq!(
            parse_subject("Mathematics="),
            Ok(("Mathematics".to_string(), String::new()))
        );
        assert!(parse_subject("Mathematics").is_err());
        assert!(parse_subject("=70").is_err());
    }

    #[tokio::test]
    async fn updates_to_unknown_ids_are_rejected() {
        let repository = InMemoryNoteRepository::default();
        let row = NoteUpsert {
            id: Some(NoteId("ghost".to_string())),
            title: "T".to_string(),
            content: String::new(),
            author: String::new(),
            category: Default::default(),
            tags: Vec::new(),
            university: "UCT".to_string(),
            faculty: String::new(),
            module: "M".to_string(),
            file_url: None,
            file_name: None,
            updated_at: chrono::Utc::now(),
            user_id: "user-1".to_string(),
        };

        let err = repository.upsert(row).await.expect_err("unknown id");
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
