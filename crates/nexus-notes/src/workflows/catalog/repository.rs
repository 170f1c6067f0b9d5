use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{Note, NoteId};
use super::rows::NoteUpsert;

/// Storage abstraction over the hosted note table.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes, most recently updated first.
    async fn list(&self) -> Result<Vec<Note>, RepositoryError>;
    async fn fetch(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError>;
    async fn upsert(&self, row: NoteUpsert) -> Result<Note, RepositoryError>;
    async fn set_verified(&self, id: &NoteId, verified: bool) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError>;
}

/// Object storage for note attachments.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the public URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RepositoryError>;
}

/// Error enumeration for storage collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("Server Error [{status}]: {message}")]
    Rejected { status: u16, message: String },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected storage payload: {0}")]
    Decode(String),
}

const FALLBACK_EXTENSION: &str = "bin";

static UPLOAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Object path for a new upload: `uploads/<token>-<unix millis>.<ext>`.
///
/// The extension is whatever follows the last `.` of the original name, or the
/// whole name when it has no dot. Anything but ASCII letters and digits becomes `bin`.
pub fn upload_path(file_name: &str, now: DateTime<Utc>) -> String {
    let extension = file_name
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && ext.bytes().all(|byte| byte.is_ascii_alphanumeric()))
        .unwrap_or(FALLBACK_EXTENSION);
    let sequence = UPLOAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let token = format!(
        "{:x}{:04x}",
        now.timestamp_subsec_nanos(),
        sequence & 0xffff
    );
    format!(
        "uploads/{token}-{}.{extension}",
        now.timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn upload_paths_keep_the_last_extension() {
        let now = Utc
            .with_ymd_and_hms(2025, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");

        let path = upload_path("week.3.notes.pdf", now);
        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with(&format!("-{}.pdf", now.timestamp_millis())));

        let bare = upload_path("README", now);
        assert!(bare.ends_with(".README"));
    }

    #[test]
    fn unsafe_extensions_fall_back_to_bin() {
        let now = Utc::now();
        for name in ["x./%2e%2e/other-bucket/evil", "archive.tar gz", "trailing."] {
            let path = upload_path(name, now);
            assert!(path.ends_with(".bin"), "{name} -> {path}");
            assert_eq!(path.matches('/').count(), 1);
        }
    }

    #[test]
    fn upload_paths_are_unique_within_the_same_instant() {
        let now = Utc::now();
        assert_ne!(upload_path("a.pdf", now), upload_path("a.pdf", now));
    }

    #[test]
    fn rejection_message_includes_status() {
        let err = RepositoryError::Rejected {
            status: 409,
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.to_string(), "Server Error [409]: duplicate key");
    }
}
