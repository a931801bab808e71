//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` endpoint and the probes, the domain
//! types they exchange, and the session cookie security scheme. The document
//! is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccountStatus, Alumnus, Branch, DashboardCounts, DashboardSummary, DashboardTrends, Error,
    ErrorCode, Event, News, Role, StatsSnapshot, User,
};
use crate::inbound::http::auth::{LoginRequest, LoginResponse, MeResponse, SignupRequest};
use crate::inbound::http::health::StatusResponse;
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::uploads::{
    MessageResponse, UploadManyResponse, UploadResponse, UploadedFile,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Membership portal API",
        description = "Session-authenticated access to members, branches, events, news, alumni, dashboards and documents."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::api_health,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::branches::list_branches,
        crate::inbound::http::branches::get_branch,
        crate::inbound::http::branches::create_branch,
        crate::inbound::http::branches::update_branch,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::create_event,
        crate::inbound::http::news::list_news,
        crate::inbound::http::news::get_news,
        crate::inbound::http::news::create_news,
        crate::inbound::http::alumni::list_alumni,
        crate::inbound::http::alumni::get_alumnus,
        crate::inbound::http::alumni::create_alumnus,
        crate::inbound::http::dashboard::stats,
        crate::inbound::http::dashboard::summary,
        crate::inbound::http::dashboard::trends,
        crate::inbound::http::dashboard::capture_snapshot,
        crate::inbound::http::uploads::upload,
        crate::inbound::http::uploads::upload_multiple,
        crate::inbound::http::uploads::download,
        crate::inbound::http::uploads::delete_file,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        AccountStatus,
        Branch,
        Event,
        News,
        Alumnus,
        DashboardCounts,
        DashboardSummary,
        DashboardTrends,
        StatsSnapshot,
        StatusResponse,
        LoginRequest,
        LoginResponse,
        MeResponse,
        SignupRequest,
        UploadedFile,
        UploadResponse,
        UploadManyResponse,
        MessageResponse,
    )),
    tags(
        (name = "health", description = "Status and orchestration probes"),
        (name = "auth", description = "Sign-in, sign-out and registration"),
        (name = "users", description = "Member accounts"),
        (name = "branches", description = "University branches"),
        (name = "events", description = "Branch and national events"),
        (name = "news", description = "News articles"),
        (name = "alumni", description = "Alumni register"),
        (name = "dashboard", description = "Aggregate statistics"),
        (name = "files", description = "Document uploads")
    )
)]
pub struct ApiDoc;
