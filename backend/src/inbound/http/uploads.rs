//! Document upload proxy.
//!
//! ```text
//! POST   /api/upload            multipart field `document`
//! POST   /api/upload-multiple   multipart field `documents`, at most five
//! GET    /api/file/{key}        download as an attachment
//! DELETE /api/file/{key}        admin
//! ```
//!
//! Every file is read fully and checked against the upload policy before any
//! of them reaches the store, so a rejected request stores nothing. When the
//! store fails partway through a batch, the files already written are
//! deleted again.

use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, web};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{FileStore, FileUpload, map_file_store_error};
use crate::domain::{ADMIN_ROLES, Error, Requirement};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::{HttpState, UploadPolicy};

/// Multipart field read by the single-file endpoint.
pub const SINGLE_FIELD: &str = "document";
/// Multipart field read by the multi-file endpoint.
pub const MULTIPLE_FIELD: &str = "documents";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_NAME_LEN: usize = 100;

/// Description of one stored document.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub original_name: String,
    /// Storage key.
    pub key: String,
    /// Where the document can be fetched.
    pub location: String,
    /// Size in bytes.
    pub size: usize,
    /// MIME type as sent by the client.
    pub mimetype: String,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file: UploadedFile,
}

/// Response of `POST /api/upload-multiple`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadManyResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
}

/// Response of `DELETE /api/file/{key}`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

struct Received {
    original_name: String,
    content_type: String,
    body: Bytes,
}

/// Reduce a client file name to characters safe inside an object key.
///
/// # Examples
/// ```
/// use membership_portal::inbound::http::uploads::sanitise_file_name;
///
/// assert_eq!(sanitise_file_name("minutes 2024.pdf"), "minutes_2024.pdf");
/// assert_eq!(sanitise_file_name("../../etc/passwd"), "passwd");
/// assert_eq!(sanitise_file_name(""), "document");
/// ```
pub fn sanitise_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let trimmed = cleaned.trim_matches(|ch| ch == '.' || ch == '_');
    if trimmed.is_empty() {
        "document".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn too_large(name: &str, limit: usize) -> Error {
    Error::invalid_request(format!("{name} exceeds the {limit} byte upload limit"))
        .with_details(json!({ "code": "file_too_large", "limit": limit }))
}

fn malformed(err: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
        .with_details(json!({ "code": "invalid_multipart" }))
}

async fn read_field(mut field: Field, policy: &UploadPolicy) -> Result<Received, Error> {
    let original_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or_default()
        .to_owned();
    let content_type = field
        .content_type()
        .map(ToString::to_string)
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_owned());
    let mut body = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if body.len() + chunk.len() > policy.max_file_bytes {
            return Err(too_large(&original_name, policy.max_file_bytes));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Received {
        original_name,
        content_type,
        body: body.freeze(),
    })
}

/// Read every part named `field_name`, skipping the rest.
async fn collect_files(
    mut payload: Multipart,
    field_name: &str,
    max_files: usize,
    policy: &UploadPolicy,
) -> Result<Vec<Received>, Error> {
    let mut files = Vec::new();
    while let Some(field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(field_name) {
            continue;
        }
        if files.len() == max_files {
            return Err(Error::invalid_request(format!(
                "at most {max_files} files may be uploaded at once"
            ))
            .with_details(json!({ "field": field_name, "code": "too_many_files" })));
        }
        files.push(read_field(field, policy).await?);
    }
    Ok(files)
}

async fn store(
    files: &dyn FileStore,
    policy: &UploadPolicy,
    received: Received,
) -> Result<UploadedFile, Error> {
    let key = format!(
        "{}-{}",
        Uuid::new_v4(),
        sanitise_file_name(&received.original_name)
    );
    let size = received.body.len();
    files
        .put(FileUpload {
            key: key.clone(),
            content_type: received.content_type.clone(),
            body: received.body,
        })
        .await
        .map_err(map_file_store_error)?;
    info!(%key, size, "document stored");
    Ok(UploadedFile {
        location: policy.location_for(&key),
        original_name: received.original_name,
        key,
        size,
        mimetype: received.content_type,
    })
}

/// Store a batch, removing the stored part again if any file fails.
async fn store_all(
    files: &dyn FileStore,
    policy: &UploadPolicy,
    received: Vec<Received>,
) -> Result<Vec<UploadedFile>, Error> {
    let mut stored = Vec::with_capacity(received.len());
    for item in received {
        match store(files, policy, item).await {
            Ok(file) => stored.push(file),
            Err(error) => {
                for file in &stored {
                    if let Err(cleanup) = files.delete(&file.key).await {
                        warn!(
                            key = %file.key,
                            error = %cleanup,
                            "orphaned document left in store"
                        );
                    }
                }
                return Err(error);
            }
        }
    }
    Ok(stored)
}

/// Upload one document.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Field `document`"),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file or file too large", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["files"],
    operation_id = "uploadFile"
)]
#[post("/upload")]
pub async fn upload(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    payload: Multipart,
) -> ApiResult<web::Json<UploadResponse>> {
    let mut files = collect_files(payload, SINGLE_FIELD, 1, &state.uploads).await?;
    let Some(received) = files.pop() else {
        return Err(Error::invalid_request("No file uploaded")
            .with_details(json!({ "field": SINGLE_FIELD, "code": "missing_field" })));
    };
    let file = store(state.files.as_ref(), &state.uploads, received).await?;
    Ok(web::Json(UploadResponse {
        message: "File uploaded successfully".to_owned(),
        file,
    }))
}

/// Upload up to five documents at once.
#[utoipa::path(
    post,
    path = "/api/upload-multiple",
    request_body(content_type = "multipart/form-data", description = "Field `documents`, repeated"),
    responses(
        (status = 200, description = "Files uploaded", body = UploadManyResponse),
        (status = 400, description = "No files, too many files or a file too large", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["files"],
    operation_id = "uploadFiles"
)]
#[post("/upload-multiple")]
pub async fn upload_multiple(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    payload: Multipart,
) -> ApiResult<web::Json<UploadManyResponse>> {
    let received =
        collect_files(payload, MULTIPLE_FIELD, state.uploads.max_files, &state.uploads).await?;
    if received.is_empty() {
        return Err(Error::invalid_request("No files uploaded")
            .with_details(json!({ "field": MULTIPLE_FIELD, "code": "missing_field" })));
    }
    let files = store_all(state.files.as_ref(), &state.uploads, received).await?;
    Ok(web::Json(UploadManyResponse {
        message: "Files uploaded successfully".to_owned(),
        files,
    }))
}

/// Download a stored document.
#[utoipa::path(
    get,
    path = "/api/file/{key}",
    params(("key" = String, Path, description = "Storage key")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "File not found", body = Error)
    ),
    tags = ["files"],
    operation_id = "downloadFile"
)]
#[get("/file/{key}")]
pub async fn download(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let key = path.into_inner();
    let file = state.files.get(&key).await.map_err(map_file_store_error)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{key}\""),
        ))
        .body(file.body))
}

/// Delete a stored document. Deleting a missing key succeeds.
#[utoipa::path(
    delete,
    path = "/api/file/{key}",
    params(("key" = String, Path, description = "Storage key")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["files"],
    operation_id = "deleteFile"
)]
#[delete("/file/{key}")]
pub async fn delete_file(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    identity.require(Requirement::AnyRole(ADMIN_ROLES))?;
    let key = path.into_inner();
    state.files.delete(&key).await.map_err(map_file_store_error)?;
    info!(%key, "document deleted");
    Ok(web::Json(MessageResponse {
        message: "File deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{FileStoreError, MockFileStore};
    use rstest::rstest;

    fn received(name: &str) -> Received {
        Received {
            original_name: name.to_owned(),
            content_type: "text/plain".to_owned(),
            body: Bytes::from_static(b"page"),
        }
    }

    #[tokio::test]
    async fn failed_batches_remove_the_files_already_stored() {
        let mut files = MockFileStore::new();
        files
            .expect_put()
            .withf(|file| file.key.ends_with("-a.txt"))
            .times(1)
            .returning(|_| Ok(()));
        files
            .expect_put()
            .withf(|file| file.key.ends_with("-b.txt"))
            .times(1)
            .returning(|_| Err(FileStoreError::backend("bucket unavailable")));
        files
            .expect_delete()
            .withf(|key| key.ends_with("-a.txt"))
            .times(1)
            .returning(|_| Ok(()));

        let err = store_all(
            &files,
            &UploadPolicy::default(),
            vec![received("a.txt"), received("b.txt"), received("c.txt")],
        )
        .await
        .expect_err("batch fails");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn complete_batches_keep_every_file() {
        let mut files = MockFileStore::new();
        files.expect_put().times(2).returning(|_| Ok(()));
        files.expect_delete().times(0);

        let stored = store_all(
            &files,
            &UploadPolicy::default(),
            vec![received("a.txt"), received("b.txt")],
        )
        .await
        .expect("batch stored");

        let names: Vec<_> = stored.iter().map(|file| file.original_name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[rstest]
    #[case("report.pdf", "report.pdf")]
    #[case("Budget (final).xlsx", "Budget__final_.xlsx")]
    #[case("C:\\Users\\ada\\cv.docx", "cv.docx")]
    #[case("...", "document")]
    #[case("résumé.pdf", "r_sum_.pdf")]
    fn file_names_are_sanitised(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitise_file_name(raw), expected);
    }

    #[rstest]
    fn long_names_are_truncated() {
        let name = "a".repeat(MAX_NAME_LEN * 2);
        assert_eq!(sanitise_file_name(&name).len(), MAX_NAME_LEN);
    }
}
