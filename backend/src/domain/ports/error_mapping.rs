//! Mapping from driven-port failures to API-safe domain errors.
//!
//! Connection failures become `service_unavailable`, query failures become
//! `internal`; adapter detail stays in the message, which the HTTP layer
//! redacts for 5xx responses.

use serde_json::json;
use tracing::warn;

use crate::domain::Error;

use super::{
    FileStoreError, PasswordHashError, RecordPersistenceError, StatsRepositoryError,
    UserPersistenceError,
};

/// Map account persistence failures.
pub fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
        UserPersistenceError::MissingReference { message } => missing_reference(message),
    }
}

/// Map branch, event, news and alumni persistence failures.
pub fn map_record_error(error: RecordPersistenceError) -> Error {
    match error {
        RecordPersistenceError::Connection { message } => Error::service_unavailable(message),
        RecordPersistenceError::Query { message } => Error::internal(message),
        RecordPersistenceError::MissingReference { message } => missing_reference(message),
    }
}

/// Map stats repository failures.
pub fn map_stats_error(error: StatsRepositoryError) -> Error {
    match error {
        StatsRepositoryError::Connection { message } => Error::service_unavailable(message),
        StatsRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Map file store failures.
pub fn map_file_store_error(error: FileStoreError) -> Error {
    match error {
        FileStoreError::NotFound { key } => Error::not_found(format!("file {key} not found")),
        FileStoreError::InvalidKey { key } => {
            Error::invalid_request(format!("invalid file key: {key}"))
                .with_details(json!({ "field": "key", "code": "invalid_key" }))
        }
        FileStoreError::Backend { message } => {
            warn!(%message, "file store operation failed");
            Error::internal(message)
        }
    }
}

/// Map password hashing failures.
pub fn map_password_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn missing_reference(message: String) -> Error {
    Error::invalid_request(format!("referenced record does not exist: {message}"))
        .with_details(json!({ "code": "missing_reference" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("boom"), ErrorCode::InternalError)]
    #[case(UserPersistenceError::duplicate_email("a@b.org"), ErrorCode::Conflict)]
    #[case(UserPersistenceError::missing_reference("branch 9"), ErrorCode::InvalidRequest)]
    fn user_errors(#[case] error: UserPersistenceError, #[case] code: ErrorCode) {
        assert_eq!(map_user_persistence_error(error).code(), code);
    }

    #[rstest]
    #[case(RecordPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(RecordPersistenceError::query("boom"), ErrorCode::InternalError)]
    #[case(RecordPersistenceError::missing_reference("user 4"), ErrorCode::InvalidRequest)]
    fn record_errors(#[case] error: RecordPersistenceError, #[case] code: ErrorCode) {
        assert_eq!(map_record_error(error).code(), code);
    }

    #[rstest]
    #[case(FileStoreError::not_found("k"), ErrorCode::NotFound)]
    #[case(FileStoreError::invalid_key("../k"), ErrorCode::InvalidRequest)]
    #[case(FileStoreError::backend("s3"), ErrorCode::InternalError)]
    fn file_errors(#[case] error: FileStoreError, #[case] code: ErrorCode) {
        assert_eq!(map_file_store_error(error).code(), code);
    }

    #[rstest]
    fn duplicate_email_names_the_field() {
        let error = map_user_persistence_error(UserPersistenceError::duplicate_email("a@b.org"));
        let details = error.details().expect("details");
        assert_eq!(details["field"], "email");
        assert_eq!(details["code"], "duplicate_email");
    }
}
