//! Member accounts.
//!
//! [`User`] is the read model returned to clients; it never carries the
//! password hash. Writes go through [`UserDraft`] (creation, holding the
//! plaintext password until it is hashed) or [`UserReplacement`] (full-row
//! replace, password untouched).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountStatus, BranchId, PlainPassword, Role};

/// Serial primary key of a user row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for user payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// A required field was absent or blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// The email address is not shaped like `local@domain`.
    #[error("email must look like name@domain")]
    InvalidEmail,
}

/// A member account as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Row identifier.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Role governing access and dashboard.
    pub role: Role,
    /// Home branch, if assigned.
    pub branch_id: Option<BranchId>,
    /// Whether the member sits on a branch executive.
    pub is_bec_member: bool,
    /// National executive portfolio, if any.
    pub nec_position: Option<String>,
    /// Branch executive portfolio, if any.
    pub bec_position: Option<String>,
    /// Account lifecycle status.
    pub status: AccountStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Trim `raw` and check it has a non-empty local part and domain.
///
/// # Examples
/// ```
/// use membership_portal::domain::normalise_email;
///
/// assert_eq!(normalise_email(" ada@example.org ").as_deref(), Ok("ada@example.org"));
/// assert!(normalise_email("ada").is_err());
/// ```
pub fn normalise_email(raw: &str) -> Result<String, UserValidationError> {
    let email = raw.trim();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(email.to_owned())
        }
        _ => Err(UserValidationError::InvalidEmail),
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, UserValidationError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or(UserValidationError::MissingField { field })
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Profile attributes shared by creation and replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// Role; creation defaults to [`Role::Member`].
    pub role: Role,
    /// Home branch.
    pub branch_id: Option<BranchId>,
    /// Branch executive flag.
    pub is_bec_member: bool,
    /// National executive portfolio.
    pub nec_position: Option<String>,
    /// Branch executive portfolio.
    pub bec_position: Option<String>,
    /// Status; creation defaults to [`AccountStatus::Active`].
    pub status: AccountStatus,
}

impl UserProfile {
    /// Normalise optional labels so blanks are stored as `NULL`.
    pub fn normalised(self) -> Self {
        Self {
            nec_position: optional_text(self.nec_position),
            bec_position: optional_text(self.bec_position),
            ..self
        }
    }
}

/// Validated request to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Full name.
    pub name: String,
    /// Normalised email.
    pub email: String,
    /// Plaintext password awaiting hashing.
    pub password: PlainPassword,
    /// Profile attributes.
    pub profile: UserProfile,
}

impl UserDraft {
    /// Validate the required fields; the profile starts from its defaults.
    ///
    /// # Examples
    /// ```
    /// use membership_portal::domain::{Role, UserDraft};
    ///
    /// let draft = UserDraft::try_new(Some("Ada"), Some("ada@example.org"), Some("pw"))
    ///     .expect("valid draft");
    /// assert_eq!(draft.profile.role, Role::Member);
    /// ```
    pub fn try_new(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let name = required_text(name, "name")?;
        let email = normalise_email(&required_text(email, "email")?)?;
        let password = password
            .and_then(PlainPassword::new)
            .ok_or(UserValidationError::MissingField { field: "password" })?;
        Ok(Self {
            name,
            email,
            password,
            profile: UserProfile::default(),
        })
    }

    /// Replace the profile attributes.
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile.normalised();
        self
    }

    /// Pair the draft's fields with a password hash for persistence.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            password_hash,
            profile: self.profile,
        }
    }
}

/// Insert record handed to the user repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Full name.
    pub name: String,
    /// Normalised email.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Profile attributes.
    pub profile: UserProfile,
}

/// Full-row replacement of an account's editable attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReplacement {
    /// Full name.
    pub name: String,
    /// Normalised email.
    pub email: String,
    /// Profile attributes.
    pub profile: UserProfile,
}

impl UserReplacement {
    /// Validate the required fields of a replacement.
    pub fn try_new(
        name: Option<&str>,
        email: Option<&str>,
        profile: UserProfile,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: required_text(name, "name")?,
            email: normalise_email(&required_text(email, "email")?)?,
            profile: profile.normalised(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some("a@b.org"), Some("pw"), "name")]
    #[case(Some("  "), Some("a@b.org"), Some("pw"), "name")]
    #[case(Some("Ada"), None, Some("pw"), "email")]
    #[case(Some("Ada"), Some("a@b.org"), None, "password")]
    #[case(Some("Ada"), Some("a@b.org"), Some(""), "password")]
    fn draft_requires_fields(
        #[case] name: Option<&str>,
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
        #[case] field: &'static str,
    ) {
        let err = UserDraft::try_new(name, email, password).expect_err("missing field");
        assert_eq!(err, UserValidationError::MissingField { field });
    }

    #[rstest]
    #[case("ada")]
    #[case("@example.org")]
    #[case("ada@")]
    #[case("a@b@c")]
    fn malformed_emails_are_rejected(#[case] email: &str) {
        assert_eq!(normalise_email(email), Err(UserValidationError::InvalidEmail));
    }

    #[rstest]
    fn draft_applies_creation_defaults() {
        let draft = UserDraft::try_new(Some(" Ada "), Some("ada@example.org"), Some("pw"))
            .expect("valid draft");
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.profile.role, Role::Member);
        assert_eq!(draft.profile.status, AccountStatus::Active);
        assert!(!draft.profile.is_bec_member);
        assert!(draft.profile.branch_id.is_none());
    }

    #[rstest]
    fn blank_positions_become_none() {
        let profile = UserProfile {
            nec_position: Some("  ".to_owned()),
            bec_position: Some(" Treasurer ".to_owned()),
            ..UserProfile::default()
        }
        .normalised();
        assert_eq!(profile.nec_position, None);
        assert_eq!(profile.bec_position.as_deref(), Some("Treasurer"));
    }

    #[rstest]
    fn into_new_user_keeps_profile() {
        let draft = UserDraft::try_new(Some("Ada"), Some("ada@example.org"), Some("pw"))
            .expect("valid draft")
            .with_profile(UserProfile {
                role: Role::Nec,
                ..UserProfile::default()
            });
        let new_user = draft.into_new_user("hash".to_owned());
        assert_eq!(new_user.password_hash, "hash");
        assert_eq!(new_user.profile.role, Role::Nec);
    }
}
