//! Driving port behind the dashboard statistics endpoints.

use async_trait::async_trait;

use crate::domain::{DashboardCounts, DashboardSummary, DashboardTrends, Error, StatsSnapshot};

/// Dashboard statistics use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Live row counts.
    async fn counts(&self) -> Result<DashboardCounts, Error>;

    /// Summary metrics reduced from every entity collection.
    async fn summary(&self) -> Result<DashboardSummary, Error>;

    /// Live counts compared with the latest snapshot.
    async fn trends(&self) -> Result<DashboardTrends, Error>;

    /// Persist the live counts as a new snapshot.
    async fn capture_snapshot(&self) -> Result<StatsSnapshot, Error>;
}
