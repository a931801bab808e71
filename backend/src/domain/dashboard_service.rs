//! Dashboard statistics service.
//!
//! Counts come from the database; summaries are reduced in process from the
//! entity collections; trends compare live counts against the latest
//! persisted snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AlumniRepository, BranchRepository, DashboardQuery, EventRepository, NewsRepository,
    StatsRepository, UserRepository, map_record_error, map_stats_error,
    map_user_persistence_error,
};
use crate::domain::{
    DashboardCounts, DashboardSummary, DashboardTrends, Error, StatsSnapshot, SummaryInputs,
};

/// Repositories the dashboard reads from.
#[derive(Clone)]
pub struct DashboardSources {
    pub users: Arc<dyn UserRepository>,
    pub branches: Arc<dyn BranchRepository>,
    pub events: Arc<dyn EventRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

/// Domain service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService {
    sources: DashboardSources,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Create a new service.
    pub fn new(sources: DashboardSources, clock: Arc<dyn Clock>) -> Self {
        Self { sources, clock }
    }
}

#[async_trait]
impl DashboardQuery for DashboardService {
    async fn counts(&self) -> Result<DashboardCounts, Error> {
        self.sources
            .stats
            .dashboard_counts(self.clock.utc())
            .await
            .map_err(map_stats_error)
    }

    async fn summary(&self) -> Result<DashboardSummary, Error> {
        let (users, branches, events, news, alumni) = futures_util::try_join!(
            async { self.sources.users.list().await.map_err(map_user_persistence_error) },
            async { self.sources.branches.list().await.map_err(map_record_error) },
            async { self.sources.events.list().await.map_err(map_record_error) },
            async { self.sources.news.list().await.map_err(map_record_error) },
            async { self.sources.alumni.list().await.map_err(map_record_error) },
        )?;
        let inputs = SummaryInputs {
            users: &users,
            events: &events,
            branches: &branches,
            alumni: &alumni,
            news: &news,
        };
        Ok(DashboardSummary::compute(inputs, self.clock.utc()))
    }

    async fn trends(&self) -> Result<DashboardTrends, Error> {
        let (current, baseline) = futures_util::try_join!(
            self.counts(),
            async { self.sources.stats.latest_snapshot().await.map_err(map_stats_error) },
        )?;
        Ok(DashboardTrends::compute(&current, baseline.as_ref()))
    }

    async fn capture_snapshot(&self) -> Result<StatsSnapshot, Error> {
        let counts = self.counts().await?;
        let snapshot = self
            .sources
            .stats
            .record_snapshot(&counts, self.clock.utc())
            .await
            .map_err(map_stats_error)?;
        info!(snapshot_id = snapshot.id, "dashboard snapshot captured");
        Ok(snapshot)
    }
}
