//! Alumni handlers.
//!
//! ```text
//! GET  /api/alumni        any signed-in member, most recent graduation first
//! GET  /api/alumni/{id}   any signed-in member
//! POST /api/alumni        admin or NEC
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::map_record_error;
use crate::domain::{
    ALUMNI_CURATOR_ROLES, Alumnus, BranchId, DEFAULT_CURRENT_STATUS, DEFAULT_DEGREE, Error,
    NewAlumnus, Requirement, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_date, required, required_text};

/// Alumni payload for `POST /api/alumni`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AlumnusRequest {
    pub user_id: Option<UserId>,
    pub branch_id: Option<BranchId>,
    /// `YYYY-MM-DD`.
    pub graduation_date: Option<String>,
    /// Defaults to `Not Specified`.
    pub degree: Option<String>,
    /// Defaults to `Unknown`.
    pub current_status: Option<String>,
}

fn text_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

impl TryFrom<AlumnusRequest> for NewAlumnus {
    type Error = Error;

    fn try_from(value: AlumnusRequest) -> Result<Self, Self::Error> {
        let date_field = FieldName::new("graduation_date");
        let graduation_date = required_text(value.graduation_date, date_field)?;
        Ok(Self {
            user_id: required(value.user_id, FieldName::new("user_id"))?,
            branch_id: required(value.branch_id, FieldName::new("branch_id"))?,
            graduation_date: parse_date(&graduation_date, date_field)?,
            degree: text_or(value.degree, DEFAULT_DEGREE),
            current_status: text_or(value.current_status, DEFAULT_CURRENT_STATUS),
        })
    }
}

/// List alumni.
#[utoipa::path(
    get,
    path = "/api/alumni",
    responses(
        (status = 200, description = "Alumni", body = [Alumnus]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["alumni"],
    operation_id = "listAlumni"
)]
#[get("/alumni")]
pub async fn list_alumni(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<Vec<Alumnus>>> {
    let alumni = state.alumni.list().await.map_err(map_record_error)?;
    Ok(web::Json(alumni))
}

/// Fetch one alumni record.
#[utoipa::path(
    get,
    path = "/api/alumni/{id}",
    params(("id" = i32, Path, description = "Alumni record identifier")),
    responses(
        (status = 200, description = "Alumni record", body = Alumnus),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["alumni"],
    operation_id = "getAlumnus"
)]
#[get("/alumni/{id}")]
pub async fn get_alumnus(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Alumnus>> {
    let id = path.into_inner();
    state
        .alumni
        .find_by_id(id)
        .await
        .map_err(map_record_error)?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("alumni record {id} not found")))
}

/// Record a graduate.
#[utoipa::path(
    post,
    path = "/api/alumni",
    request_body = AlumnusRequest,
    responses(
        (status = 201, description = "Alumni record created", body = Alumnus),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["alumni"],
    operation_id = "createAlumnus"
)]
#[post("/alumni")]
pub async fn create_alumnus(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<AlumnusRequest>,
) -> ApiResult<HttpResponse> {
    identity.require(Requirement::AnyRole(ALUMNI_CURATOR_ROLES))?;
    let alumnus = NewAlumnus::try_from(payload.into_inner())?;
    let created = state.alumni.insert(&alumnus).await.map_err(map_record_error)?;
    Ok(HttpResponse::Created().json(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn omitted_labels_take_defaults() {
        let request = AlumnusRequest {
            user_id: Some(UserId::new(3)),
            branch_id: Some(BranchId::new(1)),
            graduation_date: Some("2023-12-01".into()),
            degree: Some("  ".into()),
            current_status: None,
        };
        let alumnus = NewAlumnus::try_from(request).expect("valid request");
        assert_eq!(alumnus.degree, DEFAULT_DEGREE);
        assert_eq!(alumnus.current_status, DEFAULT_CURRENT_STATUS);
        assert_eq!(
            alumnus.graduation_date,
            NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date")
        );
    }

    #[rstest]
    #[case(None, Some(1), Some("2023-12-01"), "user_id")]
    #[case(Some(3), None, Some("2023-12-01"), "branch_id")]
    #[case(Some(3), Some(1), None, "graduation_date")]
    fn required_fields_are_named(
        #[case] user_id: Option<i32>,
        #[case] branch_id: Option<i32>,
        #[case] graduation_date: Option<&str>,
        #[case] field: &str,
    ) {
        let request = AlumnusRequest {
            user_id: user_id.map(UserId::new),
            branch_id: branch_id.map(BranchId::new),
            graduation_date: graduation_date.map(str::to_owned),
            ..AlumnusRequest::default()
        };
        let err = NewAlumnus::try_from(request).expect_err("missing field");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": field, "code": "missing_field" }))
        );
    }
}
