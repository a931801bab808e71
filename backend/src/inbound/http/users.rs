//! Member account handlers.
//!
//! ```text
//! GET  /api/users        executive roles
//! GET  /api/users/{id}   the account itself or executive roles
//! POST /api/users        admin
//! PUT  /api/users/{id}   admin, full-row replace
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ADMIN_ROLES, BranchId, EXECUTIVE_ROLES, Error, Requirement, User, UserDraft, UserId,
    UserProfile, UserReplacement,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_user_validation_error, parse_role, parse_status,
};

/// Account payload for `POST /api/users` and `PUT /api/users/{id}`.
///
/// `password` is required on create and ignored on replace. Omitted profile
/// fields take their creation defaults (`member`, `active`, no branch).
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// One of `member`, `nec`, `bec`, `alumni`, `admin`, `nec_member`, `bec_member`.
    pub role: Option<String>,
    pub branch_id: Option<BranchId>,
    pub is_bec_member: Option<bool>,
    pub nec_position: Option<String>,
    pub bec_position: Option<String>,
    /// One of `active`, `inactive`, `pending`.
    pub status: Option<String>,
}

impl UserRequest {
    fn profile(&self) -> Result<UserProfile, Error> {
        Ok(UserProfile {
            role: parse_role(self.role.as_deref(), FieldName::new("role"))?.unwrap_or_default(),
            branch_id: self.branch_id,
            is_bec_member: self.is_bec_member.unwrap_or(false),
            nec_position: self.nec_position.clone(),
            bec_position: self.bec_position.clone(),
            status: parse_status(self.status.as_deref(), FieldName::new("status"))?
                .unwrap_or_default(),
        })
    }

    fn into_draft(self) -> Result<UserDraft, Error> {
        let profile = self.profile()?;
        UserDraft::try_new(
            self.name.as_deref(),
            self.email.as_deref(),
            self.password.as_deref(),
        )
        .map(|draft| draft.with_profile(profile))
        .map_err(map_user_validation_error)
    }

    fn into_replacement(self) -> Result<UserReplacement, Error> {
        let profile = self.profile()?;
        UserReplacement::try_new(self.name.as_deref(), self.email.as_deref(), profile)
            .map_err(map_user_validation_error)
    }
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Accounts", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
) -> ApiResult<web::Json<Vec<User>>> {
    identity.require(Requirement::AnyRole(EXECUTIVE_ROLES))?;
    Ok(web::Json(state.users.list_users().await?))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<User>> {
    let subject = UserId::new(path.into_inner());
    identity.require(Requirement::SelfOrAnyRole {
        subject,
        roles: EXECUTIVE_ROLES,
    })?;
    Ok(web::Json(state.users.find_user(subject).await?))
}

/// Create an account with an explicit profile.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    identity.require(Requirement::AnyRole(ADMIN_ROLES))?;
    let draft = payload.into_inner().into_draft()?;
    let user = state.user_commands.create_user(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Replace an account's editable attributes.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "Account identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Account updated", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    path: web::Path<i32>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    identity.require(Requirement::AnyRole(ADMIN_ROLES))?;
    let replacement = payload.into_inner().into_replacement()?;
    let user = state
        .user_commands
        .update_user(UserId::new(path.into_inner()), replacement)
        .await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests;
