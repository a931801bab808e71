//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{LoginRecord, UserPersistenceError, UserRepository};
use crate::domain::{AccessRecord, NewUser, User, UserId, UserReplacement};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, constraint_label};
use super::models::{
    AccessRow, InvalidStoredValue, LoginRow, NewUserRow, UserReplacementRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map Diesel errors, attributing unique violations to `email`.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { .. } => UserPersistenceError::duplicate_email(email),
        DieselFailure::ForeignKeyViolation { constraint } => {
            UserPersistenceError::missing_reference(constraint_label(constraint))
        }
    }
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => {
            UserPersistenceError::query(constraint_label(constraint))
        }
    }
}

fn warn_invalid_row(error: &InvalidStoredValue) {
    warn!(
        user_id = error.id,
        column = error.column,
        value = %error.value,
        "stored user row is invalid"
    );
}

fn map_invalid_row(error: InvalidStoredValue) -> UserPersistenceError {
    warn_invalid_row(&error);
    UserPersistenceError::query(error.to_string())
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(map_invalid_row)
}

/// Convert listed rows, leaving out those with unrecognised role or status.
fn readable_users(rows: Vec<UserRow>) -> Vec<User> {
    rows.into_iter()
        .filter_map(|row| {
            User::try_from(row)
                .inspect_err(warn_invalid_row)
                .ok()
        })
        .collect()
}

/// Pair the raw access text with the parsed account, if it parses.
fn login_record(row: LoginRow) -> LoginRecord {
    let access = AccessRecord::from(AccessRow {
        id: row.user.id,
        role: row.user.role.clone(),
        status: row.user.status.clone(),
        branch_id: row.user.branch_id,
    });
    let user = User::try_from(row.user).inspect_err(warn_invalid_row).ok();
    LoginRecord {
        access,
        user,
        password_hash: row.password_hash,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(readable_users(rows))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_login_record(
        &self,
        email: &str,
    ) -> Result<Option<LoginRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LoginRow> = users::table
            .filter(users::email.eq(email))
            .select(LoginRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(login_record))
    }

    async fn find_access_record(
        &self,
        id: UserId,
    ) -> Result<Option<AccessRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccessRow> = users::table
            .find(id.get())
            .select(AccessRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(AccessRecord::from))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &user.email))?;
        row_to_user(row)
    }

    async fn replace(
        &self,
        id: UserId,
        replacement: &UserReplacement,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(UserReplacementRow::from(replacement))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, &replacement.email))?;
        row.map(row_to_user).transpose()
    }
}
