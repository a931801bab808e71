//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{AccessRecord, NewUser, User, UserId, UserReplacement};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// A referenced row (such as the branch) does not exist.
        MissingReference { message: String } => "referenced record missing: {message}",
    }
}

/// Account row paired with its stored password hash.
///
/// Only the login flow reads this; every other lookup returns [`User`]. The
/// raw role and status travel alongside the parsed account so login applies
/// the same checks as session resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRecord {
    /// Stored role and status text.
    pub access: AccessRecord,
    /// The account; `None` when its stored role or status is not recognised.
    pub user: Option<User>,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

impl LoginRecord {
    /// Record for an account whose stored values all parsed.
    pub fn for_user(user: User, password_hash: impl Into<String>) -> Self {
        Self {
            access: AccessRecord {
                id: user.id,
                role: user.role.as_str().to_owned(),
                status: user.status.as_str().to_owned(),
                branch_id: user.branch_id,
            },
            user: Some(user),
            password_hash: password_hash.into(),
        }
    }
}

/// Driven port over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All accounts ordered by identifier.
    ///
    /// Rows whose stored role or status is not recognised are left out.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account and its password hash by email.
    async fn find_login_record(
        &self,
        email: &str,
    ) -> Result<Option<LoginRecord>, UserPersistenceError>;

    /// Fetch the raw role and status text used for access resolution.
    async fn find_access_record(
        &self,
        id: UserId,
    ) -> Result<Option<AccessRecord>, UserPersistenceError>;

    /// Insert an account, failing with
    /// [`UserPersistenceError::DuplicateEmail`] when the email is taken.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Replace an account's editable attributes; `None` when the id is
    /// unknown.
    async fn replace(
        &self,
        id: UserId,
        replacement: &UserReplacement,
    ) -> Result<Option<User>, UserPersistenceError>;
}
