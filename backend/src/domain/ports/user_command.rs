//! Driving ports for reading and writing member accounts.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId, UserReplacement};

/// Read-side use-cases over accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every account.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One account; `not_found` when the id is unknown.
    async fn find_user(&self, id: UserId) -> Result<User, Error>;
}

/// Write-side use-cases over accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Create an account with the draft's profile, as an administrator would.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Self-service registration: role `member` and status `active` are
    /// forced; only the branch is taken from the draft.
    async fn register_member(&self, draft: UserDraft) -> Result<User, Error>;

    /// Replace an account's editable attributes.
    async fn update_user(&self, id: UserId, replacement: UserReplacement) -> Result<User, Error>;
}
