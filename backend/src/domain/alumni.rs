//! Alumni records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BranchId, UserId};

/// Degree recorded when none is supplied.
pub const DEFAULT_DEGREE: &str = "Not Specified";
/// Employment status recorded when none is supplied.
pub const DEFAULT_CURRENT_STATUS: &str = "Unknown";

/// A graduate linked to a member account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Alumnus {
    /// Row identifier.
    pub id: i32,
    /// Linked account.
    pub user_id: UserId,
    /// Branch graduated from.
    pub branch_id: BranchId,
    /// Graduation date.
    pub graduation_date: NaiveDate,
    /// Degree obtained.
    pub degree: String,
    /// Employment status, e.g. `Employed`.
    pub current_status: String,
}

/// Insert payload for an alumni record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlumnus {
    /// Linked account.
    pub user_id: UserId,
    /// Branch graduated from.
    pub branch_id: BranchId,
    /// Graduation date.
    pub graduation_date: NaiveDate,
    /// Degree; defaults to [`DEFAULT_DEGREE`].
    pub degree: String,
    /// Employment status; defaults to [`DEFAULT_CURRENT_STATUS`].
    pub current_status: String,
}
