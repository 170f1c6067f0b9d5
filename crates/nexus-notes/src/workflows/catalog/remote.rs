//! HTTP adapters for the hosted backend: a PostgREST-style row API and an object store.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Note, NoteId};
use super::repository::{FileStore, NoteRepository, RepositoryError};
use super::rows::{NoteRow, NoteUpsert};
use crate::config::BackendConfig;

#[derive(Debug, Clone)]
struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    fn new(config: &BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RepositoryError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Unknown database rejection".to_string()
                } else {
                    body
                }
            });

        Err(RepositoryError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Note table exposed over `/rest/v1/<table>`.
#[derive(Debug, Clone)]
pub struct RestNoteRepository {
    backend: BackendClient,
    table_url: String,
}

impl RestNoteRepository {
    pub fn new(config: &BackendConfig) -> Self {
        let backend = BackendClient::new(config);
        let table_url = format!("{}/rest/v1/{}", backend.base_url, config.table);
        Self { backend, table_url }
    }

    async fn decode_rows(response: Response) -> Result<Vec<Note>, RepositoryError> {
        let rows: Vec<NoteRow> = response
            .json()
            .await
            .map_err(|err| RepositoryError::Decode(err.to_string()))?;

        rows.into_iter()
            .map(|row| {
                row.into_note()
                    .map_err(|err| RepositoryError::Decode(err.to_string()))
            })
            .collect()
    }

    fn id_filter(id: &NoteId) -> String {
        format!("eq.{}", id.0)
    }
}

#[async_trait]
impl NoteRepository for RestNoteRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let request = self
            .backend
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "updated_at.desc")]);
        let response = self.backend.send(request).await?;
        Self::decode_rows(response).await
    }

    async fn fetch(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        let filter = Self::id_filter(id);
        let request = self
            .backend
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("id", filter.as_str())]);
        let response = self.backend.send(request).await?;
        Ok(Self::decode_rows(response).await?.into_iter().next())
    }

    async fn upsert(&self, row: NoteUpsert) -> Result<Note, RepositoryError> {
        let request = self
            .backend
            .client
            .post(&self.table_url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[row]);
        let response = self.backend.send(request).await?;
        Self::decode_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Decode("upsert returned no rows".to_string()))
    }

    async fn set_verified(&self, id: &NoteId, verified: bool) -> Result<(), RepositoryError> {
        let filter = Self::id_filter(id);
        let request = self
            .backend
            .client
            .patch(&self.table_url)
            .query(&[("id", filter.as_str())])
            .json(&json!({ "is_verified": verified }));
        self.backend.send(request).await?;
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError> {
        let filter = Self::id_filter(id);
        let request = self
            .backend
            .client
            .delete(&self.table_url)
            .query(&[("id", filter.as_str())]);
        self.backend.send(request).await?;
        Ok(())
    }
}

/// Attachment bucket exposed over `/storage/v1/object/<bucket>`.
#[derive(Debug, Clone)]
pub struct RestFileStore {
    backend: BackendClient,
    bucket: String,
}

impl RestFileStore {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
            bucket: config.bucket.clone(),
        }
    }

    /// Public download URL for an object written by [`FileStore::upload`].
    pub fn public_url(&self, path: &str) -> Result<Url, RepositoryError> {
        self.object_url(&["storage", "v1", "object", "public"], path)
    }

    /// Joins `scope`, the bucket and each `/`-separated piece of `path`, percent-encoding
    /// every segment so object names cannot climb out of the bucket.
    fn object_url(&self, scope: &[&str], path: &str) -> Result<Url, RepositoryError> {
        let mut url = Url::parse(&self.backend.base_url)
            .map_err(|err| RepositoryError::Unavailable(format!("invalid backend url: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                RepositoryError::Unavailable(format!(
                    "backend url cannot carry a path: {}",
                    self.backend.base_url
                ))
            })?
            .pop_if_empty()
            .extend(scope)
            .push(&self.bucket)
            .extend(path.split('/'));
        Ok(url)
    }
}

#[async_trait]
impl FileStore for RestFileStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RepositoryError> {
        let url = self.object_url(&["storage", "v1", "object"], path)?;
        let request = self
            .backend
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        self.backend.send(request).await?;
        Ok(self.public_url(path)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::workflows::catalog::domain::NoteDraft;

    fn config(server: &MockServer) -> BackendConfig {
        BackendConfig {
            base_url: server.base_url(),
            api_key: "anon-key".to_string(),
            table: "notes".to_string(),
            bucket: "note-files".to_string(),
        }
    }

    #[tokio::test]
    async fn list_orders_by_update_and_maps_rows() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/notes")
                .query_param("select", "*")
                .query_param("order", "updated_at.desc")
                .header("apikey", "anon-key")
                .header("authorization", "Bearer anon-key");
            then.status(200).json_body(json!([
                { "id": 2, "title": "Newer", "university": "UCT" },
                { "id": 1, "title": "Older" }
            ]));
        });

        let repository = RestNoteRepository::new(&config(&server));
        let notes = repository.list().await.expect("list succeeds");

        mock.assert();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id.0, "2");
        assert_eq!(notes[1].university, "Unspecified Institution");
    }

    #[tokio::test]
    async fn fetch_returns_none_for_empty_result() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/notes")
                .query_param("id", "eq.404");
            then.status(200).json_body(json!([]));
        });

        let repository = RestNoteRepository::new(&config(&server));
        let note = repository
            .fetch(&NoteId("404".to_string()))
            .await
            .expect("fetch succeeds");
        assert!(note.is_none());
    }

    #[tokio::test]
    async fn upsert_surfaces_rejections_with_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/notes")
                .header("prefer", "resolution=merge-duplicates,return=representation");
            then.status(403)
                .json_body(json!({ "message": "new row violates row-level security policy" }));
        });

        let repository = RestNoteRepository::new(&config(&server));
        let draft = NoteDraft {
            title: "Title".to_string(),
            university: "UCT".to_string(),
            module: "MAM1000".to_string(),
            ..NoteDraft::default()
        };
        let err = repository
            .upsert(NoteUpsert::from_draft(&draft, "user-1", Utc::now()))
            .await
            .expect_err("rejected");

        assert_eq!(
            err.to_string(),
            "Server Error [403]: new row violates row-level security policy"
        );
    }

    #[tokio::test]
    async fn verification_patches_the_row() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::PATCH)
                .path("/rest/v1/notes")
                .query_param("id", "eq.7")
                .json_body(json!({ "is_verified": true }));
            then.status(204);
        });

        let repository = RestNoteRepository::new(&config(&server));
        repository
            .set_verified(&NoteId("7".to_string()), true)
            .await
            .expect("patch succeeds");
        mock.assert();
    }

    #[tokio::test]
    async fn upload_returns_public_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/storage/v1/object/note-files/uploads/abc-1.pdf")
                .header("content-type", "application/pdf");
            then.status(200).json_body(json!({ "Key": "note-files/uploads/abc-1.pdf" }));
        });

        let store = RestFileStore::new(&config(&server));
        let url = store
            .upload("uploads/abc-1.pdf", b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .expect("upload succeeds");

        mock.assert();
        assert_eq!(
            url,
            format!(
                "{}/storage/v1/object/public/note-files/uploads/abc-1.pdf",
                server.base_url()
            )
        );
    }

    #[tokio::test]
    async fn upload_segments_are_percent_encoded() {
        let server = MockServer::start();
        let outside = server.mock(|when, then| {
            when.method(POST).path("/storage/v1/object/other-bucket/evil");
            then.status(200);
        });
        let inside = server.mock(|when, then| {
            when.method(POST).path_contains("/storage/v1/object/note-files/");
            then.status(200);
        });

        let store = RestFileStore::new(&config(&server));
        let url = store
            .upload(
                "uploads/x/%2e%2e/%2e%2e/%2e%2e/other-bucket/evil",
                b"payload".to_vec(),
                "application/octet-stream",
            )
            .await
            .expect("upload succeeds");

        outside.assert_hits(0);
        inside.assert();
        assert!(url.starts_with(&format!(
            "{}/storage/v1/object/public/note-files/uploads/x/%252e%252e/",
            server.base_url()
        )));
    }
}
