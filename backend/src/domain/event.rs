//! Branch events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BranchId, UserId};

/// Event type applied when the creator does not name one.
pub const DEFAULT_EVENT_TYPE: &str = "General";

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Row identifier.
    pub id: i32,
    /// Headline.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Hosting branch.
    pub branch_id: BranchId,
    /// Account that created the event.
    pub created_by: UserId,
    /// Free-form category.
    pub event_type: String,
}

/// Insert payload for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Headline.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Hosting branch.
    pub branch_id: BranchId,
    /// Creator; defaults to the caller.
    pub created_by: UserId,
    /// Category; defaults to [`DEFAULT_EVENT_TYPE`].
    pub event_type: String,
}
