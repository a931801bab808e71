//! News articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BranchId, UserId};

/// A published article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct News {
    /// Row identifier.
    pub id: i32,
    /// Headline.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Publishing branch.
    pub branch_id: BranchId,
    /// Author account.
    pub author_id: UserId,
    /// Publication timestamp.
    pub publish_date: DateTime<Utc>,
}

/// Insert payload for an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNews {
    /// Headline.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Publishing branch.
    pub branch_id: BranchId,
    /// Author; defaults to the caller.
    pub author_id: UserId,
    /// Publication timestamp; defaults to now.
    pub publish_date: DateTime<Utc>,
}
