//! Driving port resolving a session credential into a request identity.

use async_trait::async_trait;

use crate::domain::{AccessState, Error, UserId};

/// Resolve the session-bound user id into a terminal [`AccessState`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Walk the access state machine for `credential`.
    ///
    /// Returns `Err` only when the lookup itself fails; denials are reported
    /// as [`AccessState::Denied`].
    async fn resolve(&self, credential: Option<UserId>) -> Result<AccessState, Error>;
}
