//! Port for dashboard counts and their persisted snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DashboardCounts, StatsSnapshot};

use super::define_port_error;

define_port_error! {
    /// Errors raised by stats repository adapters.
    pub enum StatsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stats repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "stats repository query failed: {message}",
    }
}

/// Driven port computing live counts and storing trend baselines.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Count rows as of `now`. Any failing sub-query fails the whole call.
    async fn dashboard_counts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DashboardCounts, StatsRepositoryError>;

    /// Most recently captured snapshot, if any.
    async fn latest_snapshot(&self) -> Result<Option<StatsSnapshot>, StatsRepositoryError>;

    /// Persist `counts` as a snapshot captured at `captured_at`.
    async fn record_snapshot(
        &self,
        counts: &DashboardCounts,
        captured_at: DateTime<Utc>,
    ) -> Result<StatsSnapshot, StatsRepositoryError>;
}
