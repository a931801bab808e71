//! Handler tests for the member account endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::domain::Role;
use crate::inbound::http::test_utils::{api_app, login_request, session_cookie};
use crate::test_support::http::TestPortal;

const PASSWORD: &str = "correct horse";

#[fixture]
fn portal() -> TestPortal {
    let portal = TestPortal::new();
    portal.account("admin@example.org", Role::Admin, PASSWORD);
    portal.account("bec@example.org", Role::Bec, PASSWORD);
    portal.account("member@example.org", Role::Member, PASSWORD);
    portal
}

async fn body_json<B: actix_web::body::MessageBody>(
    res: actix_web::dev::ServiceResponse<B>,
) -> Value {
    let body = actix_test::read_body(res).await;
    serde_json::from_slice(&body).expect("json body")
}

#[rstest]
#[case("admin@example.org", StatusCode::OK)]
#[case("bec@example.org", StatusCode::OK)]
#[case("member@example.org", StatusCode::FORBIDDEN)]
#[actix_rt::test]
async fn listing_requires_an_executive_role(
    portal: TestPortal,
    #[case] email: &str,
    #[case] expected: StatusCode,
) {
    let app = actix_test::init_service(api_app(portal.state())).await;
    let login = actix_test::call_service(&app, login_request(email, PASSWORD).to_request()).await;
    let cookie = session_cookie(&login);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_rt::test]
async fn members_may_read_only_themselves(portal: TestPortal) {
    let own_id = portal
        .account("self@example.org", Role::Member, PASSWORD)
        .id;
    let app = actix_test::init_service(api_app(portal.state())).await;
    let login = actix_test::call_service(
        &app,
        login_request("self@example.org", PASSWORD).to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let own = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{own_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(own.status(), StatusCode::OK);
    let body = body_json(own).await;
    assert_eq!(body["email"], "self@example.org");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let other = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_rt::test]
async fn unauthenticated_create_is_rejected(portal: TestPortal) {
    let before = portal.portal.user_count();
    let app = actix_test::init_service(api_app(portal.state())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "name": "Eve", "email": "eve@example.org", "password": "pw" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(portal.portal.user_count(), before);
}

#[rstest]
#[actix_rt::test]
async fn admin_creates_accounts_with_defaults(portal: TestPortal) {
    let app = actix_test::init_service(api_app(portal.state())).await;
    let login = actix_test::call_service(
        &app,
        login_request("admin@example.org", PASSWORD).to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(json!({ "name": "Thandi", "email": "thandi@example.org", "password": "pw" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["role"], "member");
    assert_eq!(body["status"], "active");
    assert_eq!(body["is_bec_member"], false);
    assert_eq!(body["branch_id"], Value::Null);
}

#[rstest]
#[case(
    json!({ "name": "Dup", "email": "member@example.org", "password": "pw" }),
    StatusCode::CONFLICT
)]
#[case(json!({ "name": "NoPassword", "email": "new@example.org" }), StatusCode::BAD_REQUEST)]
#[case(
    json!({ "name": "BadRole", "email": "new@example.org", "password": "pw", "role": "root" }),
    StatusCode::BAD_REQUEST
)]
#[case(
    json!({ "name": "NoBranch", "email": "new@example.org", "password": "pw", "branch_id": 999 }),
    StatusCode::BAD_REQUEST
)]
#[actix_rt::test]
async fn invalid_creates_store_nothing(
    portal: TestPortal,
    #[case] payload: Value,
    #[case] expected: StatusCode,
) {
    let before = portal.portal.user_count();
    let app = actix_test::init_service(api_app(portal.state())).await;
    let login = actix_test::call_service(
        &app,
        login_request("admin@example.org", PASSWORD).to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
    assert_eq!(portal.portal.user_count(), before);
}

#[rstest]
#[actix_rt::test]
async fn update_replaces_the_profile(portal: TestPortal) {
    let target = portal.account("target@example.org", Role::Member, PASSWORD).id;
    let app = actix_test::init_service(api_app(portal.state())).await;
    let login = actix_test::call_service(
        &app,
        login_request("admin@example.org", PASSWORD).to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/users/{target}"))
            .cookie(cookie.clone())
            .set_json(json!({
                "name": "Target",
                "email": "target@example.org",
                "role": "nec",
                "nec_position": "Secretary General"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["role"], "nec");
    assert_eq!(body["nec_position"], "Secretary General");

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users/4242")
            .cookie(cookie)
            .set_json(json!({ "name": "Ghost", "email": "ghost@example.org" }))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
