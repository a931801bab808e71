//! PostgreSQL-backed repositories for branches, events, news and alumni.
//!
//! The four adapters share the pool and the error mapping; each one is a thin
//! translation between its row structs and the domain records.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AlumniRepository, BranchRepository, EventRepository, NewsRepository, RecordPersistenceError,
};
use crate::domain::{
    Alumnus, Branch, BranchDraft, BranchId, Event, NewAlumnus, NewEvent, NewNews, News,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, constraint_label};
use super::models::{
    AlumnusRow, BranchRow, BranchWriteRow, EventRow, NewAlumnusRow, NewEventRow, NewNewsRow,
    NewsRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{alumni, branches, events, news};

fn map_pool_error(error: PoolError) -> RecordPersistenceError {
    RecordPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RecordPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => RecordPersistenceError::connection(message),
        DieselFailure::Query(message) => RecordPersistenceError::query(message),
        DieselFailure::ForeignKeyViolation { constraint } => {
            RecordPersistenceError::missing_reference(constraint_label(constraint))
        }
        DieselFailure::UniqueViolation { constraint } => RecordPersistenceError::query(format!(
            "unique violation: {}",
            constraint_label(constraint)
        )),
    }
}

macro_rules! diesel_repository {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pool: DbPool,
        }

        impl $name {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }
    };
}

diesel_repository!(
    /// Diesel-backed implementation of the `BranchRepository` port.
    DieselBranchRepository
);
diesel_repository!(
    /// Diesel-backed implementation of the `EventRepository` port.
    DieselEventRepository
);
diesel_repository!(
    /// Diesel-backed implementation of the `NewsRepository` port.
    DieselNewsRepository
);
diesel_repository!(
    /// Diesel-backed implementation of the `AlumniRepository` port.
    DieselAlumniRepository
);

#[async_trait]
impl BranchRepository for DieselBranchRepository {
    async fn list(&self) -> Result<Vec<Branch>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BranchRow> = branches::table
            .order(branches::id.asc())
            .select(BranchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Branch::from).collect())
    }

    async fn find_by_id(&self, id: BranchId) -> Result<Option<Branch>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BranchRow> = branches::table
            .find(id.get())
            .select(BranchRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Branch::from))
    }

    async fn insert(&self, draft: &BranchDraft) -> Result<Branch, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: BranchRow = diesel::insert_into(branches::table)
            .values(BranchWriteRow::from(draft))
            .returning(BranchRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn replace(
        &self,
        id: BranchId,
        draft: &BranchDraft,
    ) -> Result<Option<Branch>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BranchRow> = diesel::update(branches::table.find(id.get()))
            .set(BranchWriteRow::from(draft))
            .returning(BranchRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Branch::from))
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn list(&self) -> Result<Vec<Event>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = events::table
            .order((events::date.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EventRow> = events::table
            .find(id)
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Event::from))
    }

    async fn insert(&self, event: &NewEvent) -> Result<Event, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: EventRow = diesel::insert_into(events::table)
            .values(NewEventRow::from(event))
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}

#[async_trait]
impl NewsRepository for DieselNewsRepository {
    async fn list(&self) -> Result<Vec<News>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewsRow> = news::table
            .order((news::publish_date.desc(), news::id.desc()))
            .select(NewsRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(News::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<News>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NewsRow> = news::table
            .find(id)
            .select(NewsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(News::from))
    }

    async fn insert(&self, item: &NewNews) -> Result<News, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: NewsRow = diesel::insert_into(news::table)
            .values(NewNewsRow::from(item))
            .returning(NewsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}

#[async_trait]
impl AlumniRepository for DieselAlumniRepository {
    async fn list(&self) -> Result<Vec<Alumnus>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AlumnusRow> = alumni::table
            .order((alumni::graduation_date.desc(), alumni::id.desc()))
            .select(AlumnusRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Alumnus::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Alumnus>, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AlumnusRow> = alumni::table
            .find(id)
            .select(AlumnusRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Alumnus::from))
    }

    async fn insert(&self, alumnus: &NewAlumnus) -> Result<Alumnus, RecordPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: AlumnusRow = diesel::insert_into(alumni::table)
            .values(NewAlumnusRow::from(alumnus))
            .returning(AlumnusRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}
