//! News handlers.
//!
//! ```text
//! GET  /api/news        any signed-in member, newest first
//! GET  /api/news/{id}   any signed-in member
//! POST /api/news        executive roles; the caller becomes the author
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::map_record_error;
use crate::domain::{BranchId, EXECUTIVE_ROLES, Error, NewNews, News, Requirement};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_timestamp, required, required_text};

/// Article payload for `POST /api/news`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NewsRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub branch_id: Option<BranchId>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; defaults to now.
    pub publish_date: Option<String>,
}

/// List articles, newest first.
#[utoipa::path(
    get,
    path = "/api/news",
    responses(
        (status = 200, description = "Articles", body = [News]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["news"],
    operation_id = "listNews"
)]
#[get("/news")]
pub async fn list_news(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<Vec<News>>> {
    let news = state.news.list().await.map_err(map_record_error)?;
    Ok(web::Json(news))
}

/// Fetch one article.
#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(("id" = i32, Path, description = "Article identifier")),
    responses(
        (status = 200, description = "Article", body = News),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["news"],
    operation_id = "getNews"
)]
#[get("/news/{id}")]
pub async fn get_news(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<News>> {
    let id = path.into_inner();
    state
        .news
        .find_by_id(id)
        .await
        .map_err(map_record_error)?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("news article {id} not found")))
}

/// Publish an article.
#[utoipa::path(
    post,
    path = "/api/news",
    request_body = NewsRequest,
    responses(
        (status = 201, description = "Article created", body = News),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["news"],
    operation_id = "createNews"
)]
#[post("/news")]
pub async fn create_news(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<NewsRequest>,
) -> ApiResult<HttpResponse> {
    identity.require(Requirement::AnyRole(EXECUTIVE_ROLES))?;
    let NewsRequest {
        title,
        content,
        branch_id,
        publish_date,
    } = payload.into_inner();
    let date_field = FieldName::new("publish_date");
    let publish_date = match publish_date.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => parse_timestamp(&raw, date_field)?,
        None => state.clock.utc(),
    };
    let article = NewNews {
        title: required_text(title, FieldName::new("title"))?,
        content: required_text(content, FieldName::new("content"))?,
        branch_id: required(branch_id, FieldName::new("branch_id"))?,
        author_id: identity.identity().user_id,
        publish_date,
    };
    let created = state.news.insert(&article).await.map_err(map_record_error)?;
    Ok(HttpResponse::Created().json(created))
}
