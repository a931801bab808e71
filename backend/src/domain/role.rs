//! Membership roles and account statuses.
//!
//! Both enums are stored as lowercase text in PostgreSQL and travel over the
//! wire in the same snake_case form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role governing what a member may see and do.
///
/// # Examples
/// ```
/// use membership_portal::domain::Role;
///
/// let role: Role = "nec_member".parse().expect("known role");
/// assert_eq!(role, Role::NecMember);
/// assert_eq!(role.as_str(), "nec_member");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// General national member.
    #[default]
    Member,
    /// National executive committee.
    Nec,
    /// Branch executive committee.
    Bec,
    /// Graduated member.
    Alumni,
    /// Portal administrator.
    Admin,
    /// General member holding an NEC portfolio.
    NecMember,
    /// General member holding a BEC portfolio.
    BecMember,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 7] = [
        Self::Member,
        Self::Nec,
        Self::Bec,
        Self::Alumni,
        Self::Admin,
        Self::NecMember,
        Self::BecMember,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Nec => "nec",
            Self::Bec => "bec",
            Self::Alumni => "alumni",
            Self::Admin => "admin",
            Self::NecMember => "nec_member",
            Self::BecMember => "bec_member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {input}")]
pub struct ParseRoleError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseRoleError { input: s.to_owned() })
    }
}

/// Lifecycle status of an account. Only active accounts may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// May authenticate and use the portal.
    #[default]
    Active,
    /// Disabled by an administrator.
    Inactive,
    /// Awaiting approval.
    Pending,
}

impl AccountStatus {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }

    /// Whether the account may hold a session.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown account status: {input}")]
pub struct ParseAccountStatusError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::str::FromStr for AccountStatus {
    type Err = ParseAccountStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            _ => Err(ParseAccountStatusError { input: s.to_owned() }),
        }
    }
}
