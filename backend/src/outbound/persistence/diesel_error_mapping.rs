//! Shared Diesel error classification for the portal repositories.
//!
//! Each repository maps a [`DieselFailure`] onto its own port error; this
//! module owns the logging and the decision of which database errors count
//! as connection loss versus constraint violations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Database failure reduced to the categories the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection was lost mid-operation.
    Connection(&'static str),
    /// Any other query failure.
    Query(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
}

/// Log `error` and reduce it to a [`DieselFailure`].
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(_, _) => DieselFailure::Query("database error"),
        _ => DieselFailure::Query("database error"),
    }
}

/// Human-readable label for a violated constraint.
pub(crate) fn constraint_label(constraint: Option<String>) -> String {
    constraint.unwrap_or_else(|| "unnamed constraint".to_owned())
}
