//! Session endpoints.
//!
//! ```text
//! POST /api/login  {"email":"ada@example.org","password":"…"}
//! POST /api/logout
//! POST /api/signup {"name":"Ada","email":"ada@example.org","password":"…"}
//! GET  /api/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    BranchId, Dashboard, Error, LoginCredentials, User, UserDraft, UserId, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_login_validation_error, map_user_validation_error};

/// Login request body for `POST /api/login`.
///
/// Fields are optional on the wire so a missing field surfaces as a `400`
/// naming the field rather than a generic deserialisation failure.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
    /// Canonical dashboard of the account's role.
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

/// Current session payload for `GET /api/me`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub user: User,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

/// Self-service registration body for `POST /api/signup`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub branch_id: Option<BranchId>,
}

fn redirect_for(user: &User) -> String {
    Dashboard::for_role(user.role).canonical_path().to_owned()
}

/// Authenticate a member and establish a session.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account is not active", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(user.id)?;
    info!(user_id = %user.id, role = %user.role, "member signed in");
    Ok(web::Json(LoginResponse {
        success: true,
        message: "Login successful".to_owned(),
        redirect_url: redirect_for(&user),
        user,
    }))
}

/// End the current session. Succeeds whether or not one existed.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Register a new member account.
///
/// Role and status are fixed to `member`/`active`; only the branch may be
/// chosen. The caller is not signed in automatically.
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        name,
        email,
        password,
        branch_id,
    } = payload.into_inner();
    let draft = UserDraft::try_new(name.as_deref(), email.as_deref(), password.as_deref())
        .map_err(map_user_validation_error)?
        .with_profile(UserProfile {
            branch_id,
            ..UserProfile::default()
        });
    let user = state.user_commands.register_member(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

/// The account behind the current session.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Signed-in account", body = MeResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
) -> ApiResult<web::Json<MeResponse>> {
    let id: UserId = identity.identity().user_id;
    let user = state.users.find_user(id).await?;
    Ok(web::Json(MeResponse {
        redirect_url: redirect_for(&user),
        user,
    }))
}
