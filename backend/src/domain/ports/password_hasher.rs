//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PlainPassword;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing or verification failed to run.
        Failed { message: String } => "password hashing failed: {message}",
    }
}

/// Driven port hashing and verifying passwords.
///
/// Implementations are expected to be slow by construction and must not
/// block the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of `password`.
    async fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash. A malformed hash verifies as
    /// `false` rather than failing.
    async fn verify(&self, password: &PlainPassword, hash: &str)
    -> Result<bool, PasswordHashError>;
}
