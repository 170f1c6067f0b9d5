use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::catalog::domain::{Category, Note, NoteDraft, NoteId};
use crate::workflows::catalog::repository::{FileStore, NoteRepository, RepositoryError};
use crate::workflows::catalog::rows::NoteUpsert;
use crate::workflows::catalog::NoteCatalogService;

pub(crate) fn note(id: &str, title: &str, university: &str, faculty: &str, module: &str) -> Note {
    Note {
        id: NoteId(id.to_string()),
        title: title.to_string(),
        content: format!("Notes on {title}"),
        author: "Anonymous".to_string(),
        category: Category::General,
        created_at: None,
        updated_at: None,
        tags: Vec::new(),
        university: university.to_string(),
        faculty: faculty.to_string(),
        module: module.to_string(),
        file_url: None,
        file_name: None,
        is_verified: false,
    }
}

pub(super) fn draft(title: &str, university: &str, module: &str) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        content: "Worked examples".to_string(),
        author: "thandi".to_string(),
        category: Category::Mathematics,
        university: university.to_string(),
        faculty: "Science".to_string(),
        module: module.to_string(),
        ..NoteDraft::default()
    }
}

pub(super) fn build_service() -> (
    NoteCatalogService<MemoryNoteRepository, MemoryFileStore>,
    Arc<MemoryNoteRepository>,
    Arc<MemoryFileStore>,
) {
    let repository = Arc::new(MemoryNoteRepository::default());
    let files = Arc::new(MemoryFileStore::default());
    let service = NoteCatalogService::new(repository.clone(), files.clone());
    (service, repository, files)
}

#[derive(Default)]
pub(super) struct MemoryNoteRepository {
    notes: Mutex<HashMap<NoteId, Note>>,
    next_id: AtomicU64,
}

impl MemoryNoteRepository {
    pub(super) fn seeded(notes: Vec<Note>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.notes.lock().expect("repository mutex poisoned");
            for note in notes {
                guard.insert(note.id.clone(), note);
            }
        }
        repository
    }

    pub(super) fn stored(&self, id: &str) -> Option<Note> {
        self.notes
            .lock()
            .expect("repository mutex poisoned")
            .get(&NoteId(id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let guard = self.notes.lock().expect("repository mutex poisoned");
        let mut notes: Vec<Note> = guard.values().cloned().collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    async fn fetch(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        let guard = self.notes.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    async fn upsert(&self, row: NoteUpsert) -> Result<Note, RepositoryError> {
        let mut guard = self.notes.lock().expect("repository mutex poisoned");
        let id = row.id.clone().unwrap_or_else(|| {
            NoteId((self.next_id.fetch_add(1, Ordering::Relaxed) + 100).to_string())
        });
        let existing = guard.get(&id);
        let created_at = existing.and_then(|note| note.created_at);
        let verified = existing.map(|note| note.is_verified).unwrap_or(false);
        let note = row.into_note(id.clone(), created_at, verified);
        guard.insert(id, note.clone());
        Ok(note)
    }

    async fn set_verified(&self, id: &NoteId, verified: bool) -> Result<(), RepositoryError> {
        let mut guard = self.notes.lock().expect("repository mutex poisoned");
        let note = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        note.is_verified = verified;
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError> {
        let mut guard = self.notes.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryFileStore {
    uploads: Mutex<Vec<(String, usize, String)>>,
}

impl MemoryFileStore {
    /// `(path, size, content type)` for every stored object.
    pub(super) fn uploads(&self) -> Vec<(String, usize, String)> {
        self.uploads.lock().expect("file store mutex poisoned").clone()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RepositoryError> {
        self.uploads
            .lock()
            .expect("file store mutex poisoned")
            .push((path.to_string(), bytes.len(), content_type.to_string()));
        Ok(format!("https://files.test/{path}"))
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl NoteRepository for UnavailableRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    async fn fetch(&self, _id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    async fn upsert(&self, _row: NoteUpsert) -> Result<Note, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    async fn set_verified(&self, _id: &NoteId, _verified: bool) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    async fn delete(&self, _id: &NoteId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }
}

/// Backend that refuses writes the way row-level security does.
pub(super) struct RejectingRepository;

#[async_trait]
impl NoteRepository for RejectingRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn fetch(&self, _id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, _row: NoteUpsert) -> Result<Note, RepositoryError> {
        Err(rejection())
    }

    async fn set_verified(&self, _id: &NoteId, _verified: bool) -> Result<(), RepositoryError> {
        Err(rejection())
    }

    async fn delete(&self, _id: &NoteId) -> Result<(), RepositoryError> {
        Err(rejection())
    }
}

fn rejection() -> RepositoryError {
    RepositoryError::Rejected {
        status: 403,
        message: "permission denied for table notes".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
