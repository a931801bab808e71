//! Ports for the branch, event, news and alumni tables.
//!
//! These entities share one error type: they have no uniqueness constraints
//! beyond their serial keys, so the only domain-significant failure is a
//! dangling foreign key.

use async_trait::async_trait;

use crate::domain::{
    Alumnus, Branch, BranchDraft, BranchId, Event, NewAlumnus, NewEvent, NewNews, News,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by record repository adapters.
    pub enum RecordPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record repository query failed: {message}",
        /// A referenced row does not exist.
        MissingReference { message: String } => "referenced record missing: {message}",
    }
}

/// Driven port over the `branches` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchRepository: Send + Sync {
    /// All branches ordered by identifier.
    async fn list(&self) -> Result<Vec<Branch>, RecordPersistenceError>;

    /// Fetch a branch by identifier.
    async fn find_by_id(&self, id: BranchId) -> Result<Option<Branch>, RecordPersistenceError>;

    /// Insert a branch.
    async fn insert(&self, draft: &BranchDraft) -> Result<Branch, RecordPersistenceError>;

    /// Replace every attribute of a branch; `None` when the id is unknown.
    async fn replace(
        &self,
        id: BranchId,
        draft: &BranchDraft,
    ) -> Result<Option<Branch>, RecordPersistenceError>;
}

/// Driven port over the `events` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All events ordered by date, earliest first.
    async fn list(&self) -> Result<Vec<Event>, RecordPersistenceError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, RecordPersistenceError>;

    /// Insert an event.
    async fn insert(&self, event: &NewEvent) -> Result<Event, RecordPersistenceError>;
}

/// Driven port over the `news` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// All articles, newest first.
    async fn list(&self) -> Result<Vec<News>, RecordPersistenceError>;

    /// Fetch an article by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<News>, RecordPersistenceError>;

    /// Insert an article.
    async fn insert(&self, news: &NewNews) -> Result<News, RecordPersistenceError>;
}

/// Driven port over the `alumni` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    /// All alumni, most recent graduation first.
    async fn list(&self) -> Result<Vec<Alumnus>, RecordPersistenceError>;

    /// Fetch an alumni record by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Alumnus>, RecordPersistenceError>;

    /// Insert an alumni record.
    async fn insert(&self, alumnus: &NewAlumnus) -> Result<Alumnus, RecordPersistenceError>;
}
