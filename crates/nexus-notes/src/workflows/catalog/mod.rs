//! Note catalog: browse/search, hierarchical facet suggestions, editor saves,
//! moderation and attachment uploads on top of the hosted backend.

pub mod domain;
pub mod facets;
pub mod import;
pub mod remote;
pub mod repository;
pub mod router;
pub mod rows;
pub mod search;
pub mod service;
pub mod stats;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{Category, Note, NoteDraft, NoteId, NoteValidationError, UploadedFile};
pub use facets::{
    faculty_candidates, module_candidates, university_candidates, FacetCandidates, FacetRecord,
    FacetSelection,
};
pub use import::{NoteCsvImporter, NoteImportError};
pub use remote::{RestFileStore, RestNoteRepository};
pub use repository::{FileStore, NoteRepository, RepositoryError};
pub use router::catalog_router;
pub use search::{filter_notes, NoteQuery};
pub use service::{
    AuthorProfile, CatalogServiceError, NoteCatalogService, SaveOutcome, MAX_UPLOAD_BYTES,
};
pub use stats::{AuthorStats, CatalogStats};
