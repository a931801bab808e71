//! Account domain service.
//!
//! Implements the driving ports for login, per-request identity resolution
//! and account reads/writes on top of the [`UserRepository`] and
//! [`PasswordHasher`] driven ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    IdentityResolver, LoginRecord, LoginService, PasswordHasher, UserCommand, UserRepository,
    UsersQuery, map_password_hash_error, map_user_persistence_error,
};
use crate::domain::{
    AccessState, DenialReason, Error, LoginCredentials, User, UserDraft, UserId, UserProfile,
    UserReplacement,
};

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service over the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(LoginRecord {
            access,
            user,
            password_hash,
        }) = self
            .users
            .find_login_record(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("login attempted for unknown email");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &password_hash)
            .await
            .map_err(map_password_hash_error)?;
        if !matches {
            debug!(user_id = %access.id, "login rejected: password mismatch");
            return Err(invalid_credentials());
        }

        let id = access.id;
        let state = AccessState::Resolving(id).complete(Some(access));
        match state.into_result() {
            Ok(_) => {}
            Err(DenialReason::Inactive) => {
                info!(user_id = %id, "login refused for inactive account");
                return Err(DenialReason::Inactive
                    .into_error()
                    .with_details(json!({ "code": "account_inactive" })));
            }
            Err(reason) => {
                warn!(user_id = %id, ?reason, "login refused");
                return Err(reason.into_error());
            }
        }

        user.ok_or_else(|| Error::internal(format!("user {id} could not be loaded")))
    }
}

#[async_trait]
impl<U, H> IdentityResolver for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn resolve(&self, credential: Option<UserId>) -> Result<AccessState, Error> {
        let state = AccessState::default().present(credential);
        let Some(id) = state.pending_lookup() else {
            return Ok(state);
        };
        let record = self
            .users
            .find_access_record(id)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(state.complete(record))
    }
}

#[async_trait]
impl<U, H> UsersQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_persistence_error)
    }

    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<U, H> UserCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&draft.password)
            .await
            .map_err(map_password_hash_error)?;
        let user = self
            .users
            .insert(&draft.into_new_user(password_hash))
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }

    async fn register_member(&self, draft: UserDraft) -> Result<User, Error> {
        let profile = UserProfile {
            branch_id: draft.profile.branch_id,
            ..UserProfile::default()
        };
        self.create_user(draft.with_profile(profile)).await
    }

    async fn update_user(&self, id: UserId, replacement: UserReplacement) -> Result<User, Error> {
        let user = self
            .users
            .replace(id, &replacement)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(id))?;
        info!(user_id = %user.id, "account replaced");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
