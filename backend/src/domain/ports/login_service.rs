//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing infrastructure, so HTTP handler tests can substitute a double
//! instead of wiring persistence and hashing.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    ///
    /// Unknown emails and wrong passwords are indistinguishable
    /// (`unauthorized`); correct credentials for an account that is not
    /// active yield `forbidden`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
