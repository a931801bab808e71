//! Event handlers.
//!
//! ```text
//! GET  /api/events        any signed-in member, earliest first
//! GET  /api/events/{id}   any signed-in member
//! POST /api/events        executive roles; the caller becomes `created_by`
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::map_record_error;
use crate::domain::{
    BranchId, DEFAULT_EVENT_TYPE, EXECUTIVE_ROLES, Error, Event, NewEvent, Requirement, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_timestamp, required, required_text};

/// Event payload for `POST /api/events`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct EventRequest {
    pub title: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub date: Option<String>,
    pub branch_id: Option<BranchId>,
    /// Defaults to `General`.
    pub event_type: Option<String>,
}

impl EventRequest {
    fn into_new_event(self, created_by: UserId) -> Result<NewEvent, Error> {
        let date_field = FieldName::new("date");
        let date = required_text(self.date, date_field)?;
        Ok(NewEvent {
            title: required_text(self.title, FieldName::new("title"))?,
            date: parse_timestamp(&date, date_field)?,
            branch_id: required(self.branch_id, FieldName::new("branch_id"))?,
            created_by,
            event_type: self
                .event_type
                .map(|kind| kind.trim().to_owned())
                .filter(|kind| !kind.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_owned()),
        })
    }
}

/// List events ordered by date.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Events", body = [Event]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
) -> ApiResult<web::Json<Vec<Event>>> {
    let events = state.events.list().await.map_err(map_record_error)?;
    Ok(web::Json(events))
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    _identity: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Event>> {
    let id = path.into_inner();
    state
        .events
        .find_by_id(id)
        .await
        .map_err(map_record_error)?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("event {id} not found")))
}

/// Schedule an event.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<EventRequest>,
) -> ApiResult<HttpResponse> {
    identity.require(Requirement::AnyRole(EXECUTIVE_ROLES))?;
    let event = payload
        .into_inner()
        .into_new_event(identity.identity().user_id)?;
    let created = state.events.insert(&event).await.map_err(map_record_error)?;
    Ok(HttpResponse::Created().json(created))
}
