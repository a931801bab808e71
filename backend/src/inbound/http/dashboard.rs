//! Dashboard statistics handlers.
//!
//! ```text
//! GET  /api/dashboard/stats      seven live counts
//! GET  /api/dashboard/summary    metrics reduced from every collection
//! GET  /api/dashboard/trends     live counts against the latest snapshot
//! POST /api/dashboard/snapshots  admin; persist the live counts
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{
    ADMIN_ROLES, DashboardCounts, DashboardSummary, DashboardTrends, Error, Requirement,
    StatsSnapshot,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::HttpState;

/// Live row counts. Any failing sub-query fails the whole response.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardCounts),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardStats"
)]
#[get("/dashboard/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<DashboardCounts>> {
    Ok(web::Json(state.dashboard.counts().await?))
}

/// Summary metrics for the statistics dashboard.
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardSummary"
)]
#[get("/dashboard/summary")]
pub async fn summary(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<DashboardSummary>> {
    Ok(web::Json(state.dashboard.summary().await?))
}

/// Percentage change of each count since the latest snapshot.
#[utoipa::path(
    get,
    path = "/api/dashboard/trends",
    responses(
        (status = 200, description = "Dashboard trends", body = DashboardTrends),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardTrends"
)]
#[get("/dashboard/trends")]
pub async fn trends(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<DashboardTrends>> {
    Ok(web::Json(state.dashboard.trends().await?))
}

/// Capture the live counts as the new trend baseline.
#[utoipa::path(
    post,
    path = "/api/dashboard/snapshots",
    responses(
        (status = 201, description = "Snapshot recorded", body = StatsSnapshot),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "captureDashboardSnapshot"
)]
#[post("/dashboard/snapshots")]
pub async fn capture_snapshot(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
) -> ApiResult<HttpResponse> {
    identity.require(Requirement::AnyRole(ADMIN_ROLES))?;
    let snapshot = state.dashboard.capture_snapshot().await?;
    Ok(HttpResponse::Created().json(snapshot))
}
