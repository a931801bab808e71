//! Port for uploaded documents held in object storage.

use async_trait::async_trait;
use bytes::Bytes;

use super::define_port_error;

define_port_error! {
    /// Errors raised by file store adapters.
    pub enum FileStoreError {
        /// No object exists under the key.
        NotFound { key: String } => "file not found: {key}",
        /// The key cannot address an object.
        InvalidKey { key: String } => "invalid file key: {key}",
        /// The backing store failed.
        Backend { message: String } => "file store failed: {message}",
    }
}

/// Document handed to [`FileStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Storage key.
    pub key: String,
    /// MIME type recorded alongside the bytes.
    pub content_type: String,
    /// File body.
    pub body: Bytes,
}

/// Stored document returned by [`FileStore::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// MIME type, `application/octet-stream` when none was recorded.
    pub content_type: String,
    /// File body.
    pub body: Bytes,
}

/// Driven port over the document bucket.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `upload`, overwriting any object with the same key.
    async fn put(&self, upload: FileUpload) -> Result<(), FileStoreError>;

    /// Fetch the object under `key`.
    async fn get(&self, key: &str) -> Result<StoredFile, FileStoreError>;

    /// Remove the object under `key`.
    async fn delete(&self, key: &str) -> Result<(), FileStoreError>;
}
