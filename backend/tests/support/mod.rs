//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each test file pulls this module in with `mod support;`. It assembles the
//! full application over the in-memory adapters from
//! `membership_portal::test_support` and a temporary page directory.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use membership_portal::Trace;
use membership_portal::domain::Dashboard;
use membership_portal::inbound::http::health::HealthState;
use membership_portal::inbound::http::pages::{SIGNIN_PAGE, SIGNUP_PAGE, StaticPages};
use membership_portal::inbound::http::routes::configure;
use membership_portal::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use membership_portal::inbound::http::state::HttpState;
use membership_portal::test_support::cap_fs::write_file;
use membership_portal::test_support::http::TestPortal;
use tempfile::TempDir;

/// Password given to every seeded account.
pub const PASSWORD: &str = "correct horse";

/// Marker embedded in each generated page so tests can tell them apart.
pub fn page_marker(file: &str) -> String {
    format!("<!-- page:{file} -->")
}

/// Temporary static directory holding every page plus one stylesheet.
pub fn page_dir() -> TempDir {
    let root = tempfile::tempdir().expect("temporary page directory");
    let pages = [SIGNIN_PAGE, SIGNUP_PAGE]
        .into_iter()
        .chain(Dashboard::ALL.into_iter().map(Dashboard::page_file));
    for file in pages {
        write_file(root.path(), file, page_marker(file).as_bytes()).expect("write page");
    }
    write_file(root.path(), "portal.css", b"body { margin: 0; }").expect("write stylesheet");
    root
}

/// The whole application as the server assembles it, without the listener.
pub fn portal_app(
    portal: &TestPortal,
    pages: &TempDir,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    app_with_state(portal.state(), pages)
}

/// [`portal_app`] over caller-built handler state.
pub fn app_with_state(
    state: HttpState,
    pages: &TempDir,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };
    let health = HealthState::new();
    health.mark_ready();
    App::new()
        .app_data(web::Data::new(health))
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(
            StaticPages::open(pages.path()).expect("open page directory"),
        ))
        .wrap(session.middleware())
        .wrap(Trace)
        .configure(configure)
}

/// The session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Sign in through `POST /api/login` and return the session cookie.
///
/// Test files pull this in with `#[macro_use] mod support;`.
#[allow(unused_macros)]
macro_rules! sign_in {
    ($app:expr, $email:expr) => {{
        let res = actix_web::test::call_service(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/api/login")
                .set_json(serde_json::json!({
                    "email": $email,
                    "password": $crate::support::PASSWORD,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK, "sign in {}", $email);
        $crate::support::session_cookie(&res)
    }};
}
