//! Branches (university chapters).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Serial primary key of a branch row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct BranchId(i32);

impl BranchId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A branch and its externally maintained headcounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Branch {
    /// Row identifier.
    pub id: BranchId,
    /// Display name.
    pub name: String,
    /// Host university.
    pub university: Option<String>,
    /// Province the branch operates in.
    pub province: Option<String>,
    /// Number of members, never negative.
    pub member_count: i32,
    /// Number of alumni, never negative.
    pub alumni_count: i32,
}

/// Insert or full-row replacement payload for a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDraft {
    /// Display name, non-empty.
    pub name: String,
    /// Host university.
    pub university: Option<String>,
    /// Province.
    pub province: Option<String>,
    /// Member headcount.
    pub member_count: i32,
    /// Alumni headcount.
    pub alumni_count: i32,
}
