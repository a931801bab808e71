//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP adapter and the
//! persistence layer, the access-control and dashboard policies, and the
//! services implementing the driving ports. Nothing in here performs I/O
//! directly; adapters reach the outside world through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Role / AccountStatus: closed sets parsed from stored text.
//! - User, Branch, Event, News, Alumnus: entity read models.
//! - AccessState / authorize: per-request identity resolution and checks.
//! - Dashboard / route_dashboard: role-to-dashboard routing.
//! - DashboardSummary / DashboardTrends: statistics reducers.

pub mod access;
pub mod account_service;
pub mod alumni;
pub mod auth;
pub mod branch;
pub mod dashboard;
pub mod dashboard_service;
pub mod error;
pub mod event;
pub mod news;
pub mod ports;
pub mod role;
pub mod stats;
pub mod trace_id;
pub mod user;

pub use self::access::{
    ADMIN_ROLES, ALUMNI_CURATOR_ROLES, AccessRecord, AccessState, DenialReason, EXECUTIVE_ROLES,
    Requirement, ResolvedIdentity, SIGNIN_PATH, authorize,
};
pub use self::account_service::AccountService;
pub use self::alumni::{Alumnus, DEFAULT_CURRENT_STATUS, DEFAULT_DEGREE, NewAlumnus};
pub use self::auth::{LoginCredentials, LoginValidationError, PlainPassword};
pub use self::branch::{Branch, BranchDraft, BranchId};
pub use self::dashboard::{Dashboard, DashboardRoute, GENERIC_DASHBOARD_PATH, route_dashboard};
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{DEFAULT_EVENT_TYPE, Event, NewEvent};
pub use self::news::{News, NewNews};
pub use self::role::{AccountStatus, ParseAccountStatusError, ParseRoleError, Role};
pub use self::stats::{
    AlumniSummary, BranchSummary, DashboardCounts, DashboardSummary, DashboardTrends,
    EventSummary, MetricTrend, NEW_MEMBER_WINDOW_DAYS, NewsSummary, StatsSnapshot,
    SummaryInputs, TopBranch, UserSummary,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    NewUser, User, UserDraft, UserId, UserProfile, UserReplacement, UserValidationError,
    normalise_email,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use membership_portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
