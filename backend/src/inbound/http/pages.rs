//! Browser-facing pages.
//!
//! `/`, `/signin` and `/signup` are public. Dashboard paths resolve the
//! session identity and then follow [`route_dashboard`]: the caller's own
//! canonical path is served, aliases redirect, and another role's dashboard
//! is refused. Denied identities are sent back to the sign-in page.
//!
//! Page files are read from the configured static directory through a
//! `cap_std` directory handle, so request paths cannot escape it.

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};
use bytes::Bytes;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};

use crate::domain::{DashboardRoute, Error, SIGNIN_PATH, route_dashboard};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::resolve_identity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Page served for `/` and `/signin`.
pub const SIGNIN_PAGE: &str = "signin.html";
/// Page served for `/signup`.
pub const SIGNUP_PAGE: &str = "signup.html";

const ASSET_TYPES: &[(&str, &str)] = &[
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// Read-only view of the static page directory.
#[derive(Clone)]
pub struct StaticPages {
    dir: Arc<Dir>,
}

impl StaticPages {
    /// Open `root` as the page directory.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::open_ambient_dir(root, ambient_authority()).map(Self::from_dir)
    }

    /// Wrap an already opened directory.
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }

    async fn read(&self, file: String) -> Result<Bytes, Error> {
        let dir = Arc::clone(&self.dir);
        let name = file.clone();
        let outcome = web::block(move || dir.read(&name))
            .await
            .map_err(|err| Error::internal(format!("page read was cancelled: {err}")))?;
        match outcome {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(err) if is_missing(&err) => {
                debug!(%file, "page not found");
                Err(Error::not_found(format!("page {file} not found")))
            }
            Err(err) => {
                warn!(%file, error = %err, "failed to read page");
                Err(Error::internal(format!("failed to read page {file}: {err}")))
            }
        }
    }

    async fn html(&self, file: &str) -> ApiResult<HttpResponse> {
        let body = self.read(file.to_owned()).await?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}

/// cap-std reports escape attempts as permission errors; treat them like a
/// missing file.
fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput
    )
}

/// `303 See Other` to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Sign-in page, also served for `/`.
pub async fn signin_page(pages: web::Data<StaticPages>) -> ApiResult<HttpResponse> {
    pages.html(SIGNIN_PAGE).await
}

/// Registration page.
pub async fn signup_page(pages: web::Data<StaticPages>) -> ApiResult<HttpResponse> {
    pages.html(SIGNUP_PAGE).await
}

/// Every dashboard path, canonical or alias, plus `/dashboard`.
pub async fn dashboard_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    pages: web::Data<StaticPages>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let identity = match resolve_identity(&req, &state, &session).await? {
        Ok(identity) => identity,
        Err(reason) => return Ok(see_other(reason.signin_location())),
    };
    match route_dashboard(identity.role, req.path()) {
        DashboardRoute::Proceed(dashboard) => pages.html(dashboard.page_file()).await,
        DashboardRoute::Redirect(dashboard) => Ok(see_other(dashboard.canonical_path())),
        DashboardRoute::Forbidden => {
            Err(Error::forbidden("this dashboard belongs to another role"))
        }
        DashboardRoute::NotDashboard => Err(Error::not_found("no such dashboard")),
    }
}

/// Catch-all for browser paths: static assets are served from the page
/// directory, anything else goes to the sign-in page.
pub async fn fallback(req: HttpRequest, pages: web::Data<StaticPages>) -> ApiResult<HttpResponse> {
    let path = req.path().trim_start_matches('/');
    let asset_type = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            ASSET_TYPES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                .map(|(_, content_type)| *content_type)
        });
    match asset_type {
        Some(content_type) if !path.is_empty() => {
            let body = pages.read(path.to_owned()).await?;
            Ok(HttpResponse::Ok()
                .insert_header((header::CONTENT_TYPE, content_type))
                .body(body))
        }
        _ => Ok(see_other(SIGNIN_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(io::ErrorKind::NotFound, true)]
    #[case(io::ErrorKind::PermissionDenied, true)]
    #[case(io::ErrorKind::Other, false)]
    fn missing_kinds(#[case] kind: io::ErrorKind, #[case] expected: bool) {
        assert_eq!(is_missing(&io::Error::from(kind)), expected);
    }

    #[actix_rt::test]
    async fn pages_escape_attempts_are_not_found() {
        let root = tempfile::tempdir().expect("tempdir");
        let pages = StaticPages::open(root.path()).expect("open pages");
        let err = pages
            .read("../outside.html".to_owned())
            .await
            .expect_err("escape rejected");
        assert_eq!(err.code(), crate::domain::ErrorCode::NotFound);
    }
}
