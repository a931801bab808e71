//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes an `invalid_request` error whose `details` name the
//! offending field and a stable code, e.g.
//! `{"field": "email", "code": "missing_field"}`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{
    AccountStatus, Error, LoginValidationError, Role, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidEmail,
    InvalidRole,
    InvalidStatus,
    InvalidTimestamp,
    InvalidDate,
    NegativeCount,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::NegativeCount => "negative_count",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, code: ErrorCode, value: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ErrorCode::MissingField, format!("missing required field: {name}"))
}

/// Require a non-blank string, returning it trimmed.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Require a value to be present.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Reject negative headcounts; absent counts default to zero.
pub(crate) fn non_negative_count(value: Option<i32>, field: FieldName) -> Result<i32, Error> {
    match value.unwrap_or(0) {
        count if count < 0 => {
            let name = field.as_str();
            Err(value_error(
                field,
                ErrorCode::NegativeCount,
                &count.to_string(),
                format!("{name} must not be negative"),
            ))
        }
        count => Ok(count),
    }
}

pub(crate) fn parse_role(value: Option<&str>, field: FieldName) -> Result<Option<Role>, Error> {
    value
        .map(|raw| {
            raw.trim().parse::<Role>().map_err(|_| {
                let name = field.as_str();
                value_error(
                    field,
                    ErrorCode::InvalidRole,
                    raw,
                    format!("{name} is not a known role"),
                )
            })
        })
        .transpose()
}

pub(crate) fn parse_status(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<AccountStatus>, Error> {
    value
        .map(|raw| {
            raw.trim().parse::<AccountStatus>().map_err(|_| {
                let name = field.as_str();
                value_error(
                    field,
                    ErrorCode::InvalidStatus,
                    raw,
                    format!("{name} must be active, inactive or pending"),
                )
            })
        })
        .transpose()
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let raw = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            let name = field.as_str();
            value_error(
                field,
                ErrorCode::InvalidTimestamp,
                value,
                format!("{name} must be an RFC 3339 timestamp or YYYY-MM-DD date"),
            )
        })
}

/// Parse a `YYYY-MM-DD` date, also accepting the date part of a timestamp.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let raw = value.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
        .ok_or_else(|| {
            let name = field.as_str();
            value_error(
                field,
                ErrorCode::InvalidDate,
                value,
                format!("{name} must be a YYYY-MM-DD date"),
            )
        })
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::MissingField { field } => missing_field_error(FieldName::new(field)),
        UserValidationError::InvalidEmail => field_error(
            FieldName::new("email"),
            ErrorCode::InvalidEmail,
            err.to_string(),
        ),
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as ApiCode;
    use chrono::TimeZone;
    use rstest::rstest;

    const DATE: FieldName = FieldName::new("date");

    #[rstest]
    fn missing_text_names_the_field() {
        let err = required_text(Some("   ".into()), FieldName::new("title")).expect_err("blank");
        assert_eq!(err.code(), ApiCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "title", "code": "missing_field" }))
        );
    }

    #[rstest]
    #[case("2025-03-01T18:30:00Z", Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap())]
    #[case("2025-03-01T18:30:00+02:00", Utc.with_ymd_and_hms(2025, 3, 1, 16, 30, 0).unwrap())]
    #[case("2025-03-01", Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())]
    fn timestamps_accept_rfc3339_and_bare_dates(
        #[case] raw: &str,
        #[case] expected: DateTime<Utc>,
    ) {
        assert_eq!(parse_timestamp(raw, DATE).expect("valid"), expected);
    }

    #[rstest]
    #[case("next friday")]
    #[case("2025-02-30")]
    fn invalid_timestamps_are_rejected(#[case] raw: &str) {
        let err = parse_timestamp(raw, DATE).expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "date", "value": raw, "code": "invalid_timestamp" }))
        );
    }

    #[rstest]
    fn dates_accept_timestamps() {
        let field = FieldName::new("graduation_date");
        assert_eq!(
            parse_date("2024-11-30T10:00:00Z", field).expect("valid"),
            NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()
        );
        assert!(parse_date("30/11/2024", field).is_err());
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        let field = FieldName::new("role");
        assert_eq!(parse_role(Some("nec"), field).expect("valid"), Some(Role::Nec));
        assert_eq!(parse_role(None, field).expect("absent"), None);
        let err = parse_role(Some("superuser"), field).expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "role", "value": "superuser", "code": "invalid_role" }))
        );
    }

    #[rstest]
    fn negative_counts_are_rejected() {
        let field = FieldName::new("member_count");
        assert_eq!(non_negative_count(None, field).expect("default"), 0);
        assert!(non_negative_count(Some(-1), field).is_err());
    }
}
