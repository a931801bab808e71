//! `FileStore` implementation backed by any [`ObjectStore`].

use std::path::Path as FsPath;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutPayload};
use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{FileStore, FileStoreError, FileUpload, StoredFile};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Errors raised while constructing a storage backend.
#[derive(Debug, Error)]
pub enum StorageBuildError {
    /// The local root directory could not be created.
    #[error("failed to prepare storage directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The object store rejected its configuration.
    #[error("failed to configure object store: {0}")]
    Store(#[from] object_store::Error),
}

/// Object-storage adapter for uploaded documents.
///
/// Backends that cannot persist object attributes (the local filesystem)
/// store the bytes only; reads then infer the content type from the key's
/// extension.
#[derive(Clone)]
pub struct ObjectFileStore {
    store: Arc<dyn ObjectStore>,
    keeps_attributes: bool,
}

impl ObjectFileStore {
    /// Connect to an S3 bucket. Credentials and region come from the
    /// standard `AWS_*` environment variables.
    ///
    /// `endpoint` overrides the AWS endpoint for S3-compatible services.
    pub fn s3(bucket: &str, endpoint: Option<&str>) -> Result<Self, StorageBuildError> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        let store = builder.build()?;
        Ok(Self {
            store: Arc::new(store),
            keeps_attributes: true,
        })
    }

    /// Store documents beneath `root`, creating the directory if needed.
    pub fn local(root: impl AsRef<FsPath>) -> Result<Self, StorageBuildError> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(|source| {
            StorageBuildError::Directory {
                path: root.display().to_string(),
                source,
            }
        })?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self {
            store: Arc::new(store),
            keeps_attributes: false,
        })
    }

    /// Volatile store for tests and demos.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            keeps_attributes: true,
        }
    }
}

/// Validate a client-supplied key and turn it into an object path.
///
/// Keys are flat names: separators, parent references and empty names are
/// rejected so a key can never escape the bucket root.
fn object_path(key: &str) -> Result<Path, FileStoreError> {
    if key.is_empty() || key.contains('/') || key.contains('\\') || key == "." || key == ".." {
        return Err(FileStoreError::invalid_key(key));
    }
    Path::parse(key).map_err(|_| FileStoreError::invalid_key(key))
}

fn map_store_error(key: &str, error: object_store::Error) -> FileStoreError {
    match error {
        object_store::Error::NotFound { .. } => FileStoreError::not_found(key),
        other => FileStoreError::backend(other.to_string()),
    }
}

/// Best-effort content type for backends without attribute support.
fn guess_content_type(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

#[async_trait]
impl FileStore for ObjectFileStore {
    async fn put(&self, upload: FileUpload) -> Result<(), FileStoreError> {
        let path = object_path(&upload.key)?;
        let size = upload.body.len();
        let payload = PutPayload::from(upload.body);
        let result = if self.keeps_attributes {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, upload.content_type.into());
            self.store.put_opts(&path, payload, attributes.into()).await
        } else {
            self.store.put(&path, payload).await
        };
        result.map_err(|err| map_store_error(&upload.key, err))?;
        debug!(key = %upload.key, size, "stored document");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<StoredFile, FileStoreError> {
        let path = object_path(key)?;
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|err| map_store_error(key, err))?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| String::from(&**value))
            .unwrap_or_else(|| guess_content_type(key).to_owned());
        let body = result
            .bytes()
            .await
            .map_err(|err| map_store_error(key, err))?;
        Ok(StoredFile { content_type, body })
    }

    async fn delete(&self, key: &str) -> Result<(), FileStoreError> {
        let path = object_path(key)?;
        match self.store.delete(&path).await {
            // S3 deletes are idempotent; match that on every backend.
            Ok(()) | Err(object_store::Error::NotFound { .. }) => {
                debug!(key, "deleted document");
                Ok(())
            }
            Err(other) => Err(map_store_error(key, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use rstest::rstest;

    fn upload(key: &str, content_type: &str, body: &'static [u8]) -> FileUpload {
        FileUpload {
            key: key.to_owned(),
            content_type: content_type.to_owned(),
            body: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn put_then_get_keeps_body_and_content_type() {
        let store = ObjectFileStore::in_memory();
        store
            .put(upload("abc-minutes.pdf", "application/pdf", b"%PDF-1.7"))
            .await
            .expect("put succeeds");

        let stored = store.get("abc-minutes.pdf").await.expect("get succeeds");
        assert_eq!(stored.content_type, "application/pdf");
        assert_eq!(stored.body, Bytes::from_static(b"%PDF-1.7"));
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = ObjectFileStore::in_memory();
        let err = store.get("nothing-here.txt").await.expect_err("missing");
        assert_eq!(err, FileStoreError::not_found("nothing-here.txt"));
    }

    #[tokio::test]
    async fn delete_removes_object_and_tolerates_repeats() {
        let store = ObjectFileStore::in_memory();
        store
            .put(upload("k-notes.txt", "text/plain", b"hello"))
            .await
            .expect("put succeeds");

        store.delete("k-notes.txt").await.expect("first delete");
        store.delete("k-notes.txt").await.expect("second delete");
        let err = store.get("k-notes.txt").await.expect_err("gone");
        assert!(matches!(err, FileStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn local_backend_infers_content_type_from_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ObjectFileStore::local(dir.path().join("uploads")).expect("local store");
        store
            .put(upload("k-photo.PNG", "image/png", b"\x89PNG"))
            .await
            .expect("put succeeds");

        let stored = store.get("k-photo.PNG").await.expect("get succeeds");
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(stored.body, Bytes::from_static(b"\x89PNG"));
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("a/b.txt")]
    #[case("a\\b.txt")]
    fn unsafe_keys_are_rejected(#[case] key: &str) {
        let err = object_path(key).expect_err("invalid key");
        assert_eq!(err, FileStoreError::invalid_key(key));
    }

    #[rstest]
    #[case("report.pdf", "application/pdf")]
    #[case("archive.tar.gz", FALLBACK_CONTENT_TYPE)]
    #[case("no-extension", FALLBACK_CONTENT_TYPE)]
    fn content_type_guesses(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(guess_content_type(key), expected);
    }
}
