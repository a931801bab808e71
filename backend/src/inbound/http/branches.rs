//! Branch handlers.
//!
//! ```text
//! GET  /api/branches        any signed-in member
//! GET  /api/branches/{id}   any signed-in member
//! POST /api/branches        admin
//! PUT  /api/branches/{id}   admin, full-row replace
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::map_record_error;
use crate::domain::{ADMIN_ROLES, Branch, BranchDraft, BranchId, Error, Requirement};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, non_negative_count, required_text};

/// Branch payload for create and replace.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BranchRequest {
    pub name: Option<String>,
    pub university: Option<String>,
    pub province: Option<String>,
    /// Defaults to zero.
    pub member_count: Option<i32>,
    /// Defaults to zero.
    pub alumni_count: Option<i32>,
}

impl TryFrom<BranchRequest> for BranchDraft {
    type Error = Error;

    fn try_from(value: BranchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(value.name, FieldName::new("name"))?,
            university: value.university,
            province: value.province,
            member_count: non_negative_count(value.member_count, FieldName::new("member_count"))?,
            alumni_count: non_negative_count(value.alumni_count, FieldName::new("alumni_count"))?,
        })
    }
}

fn branch_not_found(id: BranchId) -> Error {
    Error::not_found(format!("branch {id} not found"))
}

/// List branches ordered by identifier.
#[utoipa::path(
    get,
    path = "/api/branches",
    responses(
        (status = 200, description = "Branches", body = [Branch]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["branches"],
    operation_id = "listBranches"
)]
#[get("/branches")]
pub async fn list_branches(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<Vec<Branch>>> {
    let branches = state.branches.list().await.map_err(map_record_error)?;
    Ok(web::Json(branches))
}

/// Fetch one branch.
#[utoipa::path(
    get,
    path = "/api/branches/{id}",
    params(("id" = i32, Path, description = "Branch identifier")),
    responses(
        (status = 200, description = "Branch", body = Branch),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["branches"],
    operation_id = "getBranch"
)]
#[get("/branches/{id}")]
pub async fn get_branch(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Branch>> {
    let id = BranchId::new(path.into_inner());
    state
        .branches
        .find_by_id(id)
        .await
        .map_err(map_record_error)?
        .map(web::Json)
        .ok_or_else(|| branch_not_found(id))
}

/// Create a branch.
#[utoipa::path(
    post,
    path = "/api/branches",
    request_body = BranchRequest,
    responses(
        (status = 201, description = "Branch created", body = Branch),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["branches"],
    operation_id = "createBranch"
)]
#[post("/branches")]
pub async fn create_branch(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<BranchRequest>,
) -> ApiResult<HttpResponse> {
    identity.require(Requirement::AnyRole(ADMIN_ROLES))?;
    let draft = BranchDraft::try_from(payload.into_inner())?;
    let branch = state.branches.insert(&draft).await.map_err(map_record_error)?;
    Ok(HttpResponse::Created().json(branch))
}

/// Replace every attribute of a branch.
#[utoipa::path(
    put,
    path = "/api/branches/{id}",
    params(("id" = i32, Path, description = "Branch identifier")),
    request_body = BranchRequest,
    responses(
        (status = 200, description = "Branch updated", body = Branch),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["branches"],
    operation_id = "updateBranch"
)]
#[put("/branches/{id}")]
pub async fn update_branch(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    path: web::Path<i32>,
    payload: web::Json<BranchRequest>,
) -> ApiResult<web::Json<Branch>> {
    identity.require(Requirement::AnyRole(ADMIN_ROLES))?;
    let id = BranchId::new(path.into_inner());
    let draft = BranchDraft::try_from(payload.into_inner())?;
    state
        .branches
        .replace(id, &draft)
        .await
        .map_err(map_record_error)?
        .map(web::Json)
        .ok_or_else(|| branch_not_found(id))
}
