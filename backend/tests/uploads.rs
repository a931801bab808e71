//! Document upload, download and deletion through the object store.

#[macro_use]
mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test as actix_test;
use membership_portal::domain::Role;
use membership_portal::inbound::http::state::UploadPolicy;
use membership_portal::test_support::http::TestPortal;
use rstest::{fixture, rstest};
use serde_json::Value;

use support::{PASSWORD, app_with_state, page_dir, portal_app};

const BOUNDARY: &str = "portal-test-boundary";

#[fixture]
fn portal() -> TestPortal {
    let portal = TestPortal::new();
    portal.account("admin@example.org", Role::Admin, PASSWORD);
    portal.account("member@example.org", Role::Member, PASSWORD);
    portal
}

/// One multipart part: field name, file name, content type and contents.
type Part<'a> = (&'a str, &'a str, &'a str, &'a str);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, content_type, contents) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, parts: &[Part<'_>]) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

#[rstest]
#[actix_rt::test]
async fn uploaded_documents_can_be_downloaded_and_deleted(portal: TestPortal) {
    let pages = page_dir();
    let app = actix_test::init_service(portal_app(&portal, &pages)).await;
    let admin = sign_in!(&app, "admin@example.org");

    let uploaded = actix_test::call_service(
        &app,
        multipart_request(
            "/api/upload",
            &[("document", "minutes 2025.pdf", "application/pdf", "%PDF-1.7 minutes")],
        )
        .cookie(admin.clone())
        .to_request(),
    )
    .await;
    assert_eq!(uploaded.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(uploaded).await;
    assert_eq!(body["message"], "File uploaded successfully");
    let file = &body["file"];
    assert_eq!(file["originalName"], "minutes 2025.pdf");
    assert_eq!(file["mimetype"], "application/pdf");
    assert_eq!(file["size"], 16);
    let key = file["key"].as_str().expect("key").to_owned();
    assert!(key.ends_with("-minutes_2025.pdf"), "{key}");
    assert_eq!(file["location"], format!("/api/file/{key}"));

    let download = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/file/{key}"))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(
        download
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/pdf")
    );
    assert_eq!(
        download
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok()),
        Some(format!("attachment; filename=\"{key}\"").as_str())
    );
    let bytes = actix_test::read_body(download).await;
    assert_eq!(&bytes[..], b"%PDF-1.7 minutes");

    for _ in 0..2 {
        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/file/{key}"))
                .cookie(admin.clone())
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::OK);
    }

    let gone = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/file/{key}"))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_rt::test]
async fn multiple_uploads_ignore_other_fields(portal: TestPortal) {
    let pages = page_dir();
    let app = actix_test::init_service(portal_app(&portal, &pages)).await;
    let member = sign_in!(&app, "member@example.org");

    let res = actix_test::call_service(
        &app,
        multipart_request(
            "/api/upload-multiple",
            &[
                ("documents", "a.txt", "text/plain", "first"),
                ("avatar", "me.png", "image/png", "ignored"),
                ("documents", "b.txt", "text/plain", "second"),
            ],
        )
        .cookie(member)
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let names: Vec<&str> = body["files"]
        .as_array()
        .expect("files")
        .iter()
        .filter_map(|file| file["originalName"].as_str())
        .collect();
    assert_eq!(names, ["a.txt", "b.txt"]);
}

#[rstest]
#[case("/api/upload", "document", "No file uploaded")]
#[case("/api/upload-multiple", "documents", "No files uploaded")]
#[actix_rt::test]
async fn missing_files_are_rejected(
    portal: TestPortal,
    #[case] uri: &str,
    #[case] field: &str,
    #[case] message: &str,
) {
    let pages = page_dir();
    let app = actix_test::init_service(portal_app(&portal, &pages)).await;
    let member = sign_in!(&app, "member@example.org");

    let res = actix_test::call_service(
        &app,
        multipart_request(uri, &[("other", "x.txt", "text/plain", "x")])
            .cookie(member)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], message);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_rt::test]
async fn more_than_five_files_are_refused(portal: TestPortal) {
    let pages = page_dir();
    let app = actix_test::init_service(portal_app(&portal, &pages)).await;
    let member = sign_in!(&app, "member@example.org");
    let parts: Vec<Part<'_>> = (0..6)
        .map(|_| ("documents", "page.txt", "text/plain", "page"))
        .collect();

    let res = actix_test::call_service(
        &app,
        multipart_request("/api/upload-multiple", &parts)
            .cookie(member)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "too_many_files");
}

#[rstest]
#[actix_rt::test]
async fn oversized_files_are_refused(portal: TestPortal) {
    let pages = page_dir();
    let state = portal.state().with_upload_policy(UploadPolicy {
        max_file_bytes: 8,
        ..UploadPolicy::default()
    });
    let app = actix_test::init_service(app_with_state(state, &pages)).await;
    let member = sign_in!(&app, "member@example.org");

    let res = actix_test::call_service(
        &app,
        multipart_request(
            "/api/upload",
            &[("document", "big.bin", "application/octet-stream", "0123456789")],
        )
        .cookie(member)
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "file_too_large");
}

#[rstest]
#[actix_rt::test]
async fn bucket_locations_use_the_public_base_url(portal: TestPortal) {
    let pages = page_dir();
    let state = portal.state().with_upload_policy(UploadPolicy {
        public_base_url: Some("https://docs.example.org".to_owned()),
        ..UploadPolicy::default()
    });
    let app = actix_test::init_service(app_with_state(state, &pages)).await;
    let member = sign_in!(&app, "member@example.org");

    let res = actix_test::call_service(
        &app,
        multipart_request("/api/upload", &[("document", "cv.pdf", "application/pdf", "cv")])
            .cookie(member)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let key = body["file"]["key"].as_str().expect("key");
    assert_eq!(
        body["file"]["location"],
        format!("https://docs.example.org/{key}")
    );
}

#[rstest]
#[actix_rt::test]
async fn uploads_require_a_session_and_deletes_an_admin(portal: TestPortal) {
    let pages = page_dir();
    let app = actix_test::init_service(portal_app(&portal, &pages)).await;

    let anonymous = actix_test::call_service(
        &app,
        multipart_request("/api/upload", &[("document", "a.txt", "text/plain", "a")]).to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let member = sign_in!(&app, "member@example.org");
    let delete = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/file/anything.txt")
            .cookie(member)
            .to_request(),
    )
    .await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}
