//! Route table of the portal.
//!
//! [`configure`] registers everything except middleware and application
//! state, so the server and in-process tests share one routing definition.
//! Unmatched `/api/*` requests get a JSON 404; every other unmatched path
//! is handled by [`pages::fallback`].

use actix_web::{HttpRequest, HttpResponse, Scope, web};

use crate::domain::{Dashboard, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::{
    alumni, auth, branches, dashboard, events, health, news, pages, uploads, users,
};

async fn api_not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!("API route {} not found", req.path())))
}

/// Every `/api` endpoint.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(health::api_health)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::signup)
        .service(auth::me)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(branches::list_branches)
        .service(branches::get_branch)
        .service(branches::create_branch)
        .service(branches::update_branch)
        .service(events::list_events)
        .service(events::get_event)
        .service(events::create_event)
        .service(news::list_news)
        .service(news::get_news)
        .service(news::create_news)
        .service(alumni::list_alumni)
        .service(alumni::get_alumnus)
        .service(alumni::create_alumnus)
        .service(dashboard::stats)
        .service(dashboard::summary)
        .service(dashboard::trends)
        .service(dashboard::capture_snapshot)
        .service(uploads::upload)
        .service(uploads::upload_multiple)
        .service(uploads::download)
        .service(uploads::delete_file)
        .default_service(web::to(api_not_found))
}

/// Register pages, probes and the API.
///
/// Expects `web::Data<HttpState>`, `web::Data<StaticPages>` and
/// `web::Data<HealthState>` to be registered on the app.
///
/// [`HttpState`]: crate::inbound::http::state::HttpState
/// [`StaticPages`]: crate::inbound::http::pages::StaticPages
/// [`HealthState`]: crate::inbound::http::health::HealthState
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health::ready)
        .service(health::live)
        .service(api_scope())
        .route("/", web::get().to(pages::signin_page))
        .route("/signin", web::get().to(pages::signin_page))
        .route("/signup", web::get().to(pages::signup_page));
    for path in Dashboard::all_paths() {
        cfg.route(path, web::get().to(pages::dashboard_page));
    }
    cfg.default_service(web::to(pages::fallback));
}
