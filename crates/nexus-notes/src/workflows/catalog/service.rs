use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{Note, NoteDraft, NoteId, NoteValidationError, UploadedFile};
use super::facets::{FacetCandidates, FacetSelection};
use super::repository::{upload_path, FileStore, NoteRepository, RepositoryError};
use super::rows::NoteUpsert;
use super::search::{filter_notes, NoteQuery};
use super::stats::{AuthorStats, CatalogStats};

/// Attachments above this size are refused before contacting the store.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const SAVE_CONFIRMATION: &str = "Note synchronized with cloud repository.";

/// Service composing the note repository and attachment store.
pub struct NoteCatalogService<R, F> {
    repository: Arc<R>,
    files: Arc<F>,
}

/// A contributor's own notes, newest first, with their figures.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorProfile {
    pub stats: AuthorStats,
    pub notes: Vec<Note>,
}

/// Result of a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub note: Note,
    pub message: &'static str,
}

impl<R, F> NoteCatalogService<R, F>
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    pub fn new(repository: Arc<R>, files: Arc<F>) -> Self {
        Self { repository, files }
    }

    /// Newest-first snapshot; a failing backend yields an empty catalog.
    pub async fn list(&self) -> Vec<Note> {
        match self.repository.list().await {
            Ok(notes) => notes,
            Err(error) => {
                warn!(%error, "note listing failed; serving empty catalog");
                Vec::new()
            }
        }
    }

    pub async fn search(&self, query: &NoteQuery) -> Vec<Note> {
        filter_notes(&self.list().await, query)
    }

    pub async fn facets(&self, selection: &FacetSelection) -> FacetCandidates {
        FacetCandidates::derive(&self.list().await, selection)
    }

    pub async fn stats(&self, author: Option<&str>) -> CatalogStats {
        CatalogStats::from_notes(&self.list().await, author)
    }

    pub async fn profile(&self, author: &str) -> AuthorProfile {
        let notes = filter_notes(&self.list().await, &NoteQuery::by_author(author));
        AuthorProfile {
            stats: AuthorStats::from_notes(&notes, author),
            notes,
        }
    }

    pub async fn get(&self, id: &NoteId) -> Option<Note> {
        match self.repository.fetch(id).await {
            Ok(note) => note,
            Err(error) => {
                warn!(%error, note_id = %id, "note lookup failed");
                None
            }
        }
    }

    /// Validate and persist an editor draft on behalf of `user_id`.
    pub async fn save(
        &self,
        draft: NoteDraft,
        user_id: &str,
    ) -> Result<SaveOutcome, CatalogServiceError> {
        draft.validate()?;

        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(CatalogServiceError::Unauthenticated);
        }

        let created = draft.is_new();
        let row = NoteUpsert::from_draft(&draft, user_id, Utc::now());
        let note = self.repository.upsert(row).await?;
        info!(note_id = %note.id, created, "note saved");

        Ok(SaveOutcome {
            note,
            message: SAVE_CONFIRMATION,
        })
    }

    pub async fn set_verified(&self, id: &NoteId, verified: bool) -> Result<(), CatalogServiceError> {
        self.repository.set_verified(id, verified).await?;
        info!(note_id = %id, verified, "note verification updated");
        Ok(())
    }

    pub async fn delete(&self, id: &NoteId) -> Result<(), CatalogServiceError> {
        self.repository.delete(id).await?;
        info!(note_id = %id, "note deleted");
        Ok(())
    }

    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadedFile, CatalogServiceError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(CatalogServiceError::MissingFileName);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(CatalogServiceError::FileTooLarge {
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let content_type = content_type
            .parse::<mime::Mime>()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let path = upload_path(file_name, Utc::now());
        let url = self
            .files
            .upload(&path, bytes, content_type.as_ref())
            .await?;
        info!(%path, "attachment uploaded");

        Ok(UploadedFile {
            url,
            name: file_name.to_string(),
        })
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("Validation Error: {0}")]
    Validation(#[from] NoteValidationError),
    #[error("Auth Error: you must be logged in to sync")]
    Unauthenticated,
    #[error("file is too large ({size} bytes); max size is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },
    #[error("upload requires a file name")]
    MissingFileName,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
