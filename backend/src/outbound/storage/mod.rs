//! Document storage adapter over the `object_store` abstraction.
//!
//! Production deployments point at an S3 bucket; development falls back to a
//! directory on the local filesystem. Tests use the in-memory backend.

mod object_file_store;

pub use object_file_store::{ObjectFileStore, StorageBuildError};
