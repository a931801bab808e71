//! PostgreSQL-backed `StatsRepository`.
//!
//! The seven dashboard counts run concurrently, each on its own pooled
//! connection; the first failure fails the aggregate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StatsRepository, StatsRepositoryError};
use crate::domain::{AccountStatus, DashboardCounts, StatsSnapshot};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, constraint_label};
use super::models::{NewStatsSnapshotRow, StatsSnapshotRow};
use super::pool::{DbPool, PoolError};
use super::schema::{alumni, branches, events, news, stats_snapshots, users};

/// Diesel-backed implementation of the `StatsRepository` port.
#[derive(Clone)]
pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StatsRepositoryError {
    StatsRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> StatsRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => StatsRepositoryError::connection(message),
        DieselFailure::Query(message) => StatsRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => {
            StatsRepositoryError::query(constraint_label(constraint))
        }
    }
}

/// Check out a dedicated connection and run one `COUNT(*)` query on it.
macro_rules! count_on_own_connection {
    ($pool:expr, $query:expr) => {
        async {
            let mut conn = $pool.get().await.map_err(map_pool_error)?;
            $query
                .count()
                .get_result::<i64>(&mut conn)
                .await
                .map_err(map_diesel_error)
        }
    };
}

#[async_trait]
impl StatsRepository for DieselStatsRepository {
    async fn dashboard_counts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DashboardCounts, StatsRepositoryError> {
        let pool = &self.pool;
        let (
            total_users,
            total_events,
            total_branches,
            total_alumni,
            total_news,
            active_users,
            upcoming_events,
        ) = tokio::try_join!(
            count_on_own_connection!(pool, users::table),
            count_on_own_connection!(pool, events::table),
            count_on_own_connection!(pool, branches::table),
            count_on_own_connection!(pool, alumni::table),
            count_on_own_connection!(pool, news::table),
            count_on_own_connection!(
                pool,
                users::table.filter(users::status.eq(AccountStatus::Active.as_str()))
            ),
            count_on_own_connection!(pool, events::table.filter(events::date.gt(now))),
        )?;

        Ok(DashboardCounts {
            total_users,
            total_events,
            total_branches,
            total_alumni,
            total_news,
            active_users,
            upcoming_events,
        })
    }

    async fn latest_snapshot(&self) -> Result<Option<StatsSnapshot>, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StatsSnapshotRow> = stats_snapshots::table
            .order((stats_snapshots::captured_at.desc(), stats_snapshots::id.desc()))
            .select(StatsSnapshotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(StatsSnapshot::from))
    }

    async fn record_snapshot(
        &self,
        counts: &DashboardCounts,
        captured_at: DateTime<Utc>,
    ) -> Result<StatsSnapshot, StatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: StatsSnapshotRow = diesel::insert_into(stats_snapshots::table)
            .values(NewStatsSnapshotRow::new(counts, captured_at))
            .returning(StatsSnapshotRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}
