//! bcrypt-backed password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on Tokio's blocking
//! pool. The plaintext copy moved into the task is zeroized on drop.

use async_trait::async_trait;
use tokio::task::JoinError;
use zeroize::Zeroizing;

use crate::domain::PlainPassword;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// [`PasswordHasher`] using bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with an explicit work factor (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn map_join_error(error: JoinError) -> PasswordHashError {
    PasswordHashError::failed(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError> {
        let plain = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plain.as_str(), cost))
            .await
            .map_err(map_join_error)?
            .map_err(|err| PasswordHashError::failed(err.to_string()))
    }

    async fn verify(
        &self,
        password: &PlainPassword,
        hash: &str,
    ) -> Result<bool, PasswordHashError> {
        let plain = Zeroizing::new(password.expose().to_owned());
        let stored = hash.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plain.as_str(), &stored))
            .await
            .map_err(map_join_error)?;
        Ok(outcome.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> PlainPassword {
        PlainPassword::new(raw).expect("non-empty password")
    }

    #[tokio::test]
    async fn hash_verifies_against_original_password() {
        let hasher = BcryptPasswordHasher::new(4);
        let hash = hasher.hash(&password("s3cret pass")).await.expect("hash");

        assert!(hash.starts_with("$2"));
        assert!(hasher.verify(&password("s3cret pass"), &hash).await.expect("verify"));
        assert!(!hasher.verify(&password("s3cret"), &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn malformed_hash_does_not_verify() {
        let hasher = BcryptPasswordHasher::new(4);
        let verified = hasher
            .verify(&password("anything"), "not-a-bcrypt-hash")
            .await
            .expect("verify runs");
        assert!(!verified);
    }

    #[tokio::test]
    async fn out_of_range_cost_fails() {
        let hasher = BcryptPasswordHasher::new(2);
        let err = hasher.hash(&password("pw")).await.expect_err("cost too low");
        assert!(matches!(err, PasswordHashError::Failed { .. }));
    }
}
