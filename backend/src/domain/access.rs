//! Access control: per-request identity resolution and capability checks.
//!
//! Every request that is not public walks a small state machine:
//!
//! ```text
//! Unauthenticated --present(None)------------------> Denied(MissingCredential)
//! Unauthenticated --present(Some(id))--------------> Resolving(id)
//! Resolving(id)   --complete(record)---------------> Authorized(identity) | Denied(reason)
//! ```
//!
//! `Authorized` and `Denied` are terminal; further transitions leave them
//! unchanged. Role and status are looked up on every request, so a
//! deactivated account loses access on its next request.

use crate::domain::{AccountStatus, BranchId, Error, Role, UserId};

/// Sign-in page that browser-facing denials redirect to.
pub const SIGNIN_PATH: &str = "/signin";

/// Roles allowed to browse the member directory and publish events or news.
pub const EXECUTIVE_ROLES: &[Role] = &[Role::Admin, Role::Nec, Role::Bec];
/// Roles allowed to curate alumni records.
pub const ALUMNI_CURATOR_ROLES: &[Role] = &[Role::Admin, Role::Nec];
/// Roles allowed to administer accounts, branches and stored files.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// Raw access attributes as stored; role and status are unparsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    /// Account identifier.
    pub id: UserId,
    /// Stored role text.
    pub role: String,
    /// Stored status text.
    pub status: String,
    /// Home branch.
    pub branch_id: Option<BranchId>,
}

/// Identity attached to an authorised request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Account identifier.
    pub user_id: UserId,
    /// Parsed role.
    pub role: Role,
    /// Home branch.
    pub branch_id: Option<BranchId>,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No session credential was presented.
    MissingCredential,
    /// The credential names an account that no longer exists.
    UnknownUser,
    /// The account exists but is not active.
    Inactive,
    /// The stored role is outside the known set.
    UnrecognizedRole,
    /// The role lacks the capability the route requires.
    InsufficientRole,
}

impl DenialReason {
    /// Map the denial to the API error returned to clients.
    pub fn into_error(self) -> Error {
        match self {
            Self::MissingCredential => Error::unauthorized("login required"),
            Self::UnknownUser => Error::unauthorized("session is no longer valid"),
            Self::Inactive => Error::forbidden("account is not active"),
            Self::UnrecognizedRole => Error::forbidden("account role is not recognised"),
            Self::InsufficientRole => Error::forbidden("insufficient permissions"),
        }
    }

    /// Where a browser should be sent after this denial.
    ///
    /// # Examples
    /// ```
    /// use membership_portal::domain::DenialReason;
    ///
    /// assert_eq!(DenialReason::Inactive.signin_location(), "/signin?error=account_inactive");
    /// assert_eq!(DenialReason::MissingCredential.signin_location(), "/signin");
    /// ```
    pub fn signin_location(self) -> &'static str {
        match self {
            Self::Inactive => "/signin?error=account_inactive",
            Self::MissingCredential
            | Self::UnknownUser
            | Self::UnrecognizedRole
            | Self::InsufficientRole => SIGNIN_PATH,
        }
    }
}

/// Per-request resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    /// Nothing inspected yet.
    #[default]
    Unauthenticated,
    /// A credential was presented and awaits lookup.
    Resolving(UserId),
    /// The credential resolved to an active account with a known role.
    Authorized(ResolvedIdentity),
    /// Resolution failed.
    Denied(DenialReason),
}

impl AccessState {
    /// Present the session credential, if any.
    #[must_use]
    pub fn present(self, credential: Option<UserId>) -> Self {
        match (self, credential) {
            (Self::Unauthenticated, Some(id)) => Self::Resolving(id),
            (Self::Unauthenticated, None) => Self::Denied(DenialReason::MissingCredential),
            (state, _) => state,
        }
    }

    /// Complete resolution with the looked-up access record.
    #[must_use]
    pub fn complete(self, record: Option<AccessRecord>) -> Self {
        match self {
            Self::Resolving(id) => resolve_record(id, record),
            state => state,
        }
    }

    /// The user id awaiting lookup, if resolution is in progress.
    pub fn pending_lookup(&self) -> Option<UserId> {
        match self {
            Self::Resolving(id) => Some(*id),
            _ => None,
        }
    }

    /// Collapse the state into an identity or a denial.
    ///
    /// Non-terminal states are reported as denials: a request that never
    /// presented a credential is unauthenticated, and one whose lookup never
    /// completed cannot be trusted.
    pub fn into_result(self) -> Result<ResolvedIdentity, DenialReason> {
        match self {
            Self::Authorized(identity) => Ok(identity),
            Self::Denied(reason) => Err(reason),
            Self::Unauthenticated => Err(DenialReason::MissingCredential),
            Self::Resolving(_) => Err(DenialReason::UnknownUser),
        }
    }
}

fn resolve_record(id: UserId, record: Option<AccessRecord>) -> AccessState {
    let Some(record) = record.filter(|record| record.id == id) else {
        return AccessState::Denied(DenialReason::UnknownUser);
    };
    let active = record
        .status
        .parse::<AccountStatus>()
        .is_ok_and(|status| status.is_active());
    if !active {
        return AccessState::Denied(DenialReason::Inactive);
    }
    match record.role.parse::<Role>() {
        Ok(role) => AccessState::Authorized(ResolvedIdentity {
            user_id: record.id,
            role,
            branch_id: record.branch_id,
        }),
        Err(_) => AccessState::Denied(DenialReason::UnrecognizedRole),
    }
}

/// Capability a route demands of the resolved identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any active account.
    Authenticated,
    /// One of the listed roles.
    AnyRole(&'static [Role]),
    /// The subject account itself, or one of the listed roles.
    SelfOrAnyRole {
        /// Account the request is about.
        subject: UserId,
        /// Roles allowed to act on other accounts.
        roles: &'static [Role],
    },
}

/// Decide whether `identity` satisfies `requirement`.
///
/// # Examples
/// ```
/// use membership_portal::domain::{
///     authorize, DenialReason, Requirement, ResolvedIdentity, Role, UserId, EXECUTIVE_ROLES,
/// };
///
/// let member = ResolvedIdentity { user_id: UserId::new(4), role: Role::Member, branch_id: None };
/// assert_eq!(
///     authorize(&member, Requirement::AnyRole(EXECUTIVE_ROLES)),
///     Err(DenialReason::InsufficientRole),
/// );
/// assert!(authorize(&member, Requirement::Authenticated).is_ok());
/// ```
pub fn authorize(
    identity: &ResolvedIdentity,
    requirement: Requirement,
) -> Result<(), DenialReason> {
    let allowed = match requirement {
        Requirement::Authenticated => true,
        Requirement::AnyRole(roles) => roles.contains(&identity.role),
        Requirement::SelfOrAnyRole { subject, roles } => {
            subject == identity.user_id || roles.contains(&identity.role)
        }
    };
    if allowed {
        Ok(())
    } else {
        Err(DenialReason::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn record(role: &str, status: &str) -> AccessRecord {
        AccessRecord {
            id: UserId::new(7),
            role: role.to_owned(),
            status: status.to_owned(),
            branch_id: Some(BranchId::new(2)),
        }
    }

    fn identity(role: Role) -> ResolvedIdentity {
        ResolvedIdentity {
            user_id: UserId::new(7),
            role,
            branch_id: None,
        }
    }

    #[rstest]
    fn missing_credential_is_denied() {
        let state = AccessState::Unauthenticated.present(None);
        assert_eq!(state, AccessState::Denied(DenialReason::MissingCredential));
    }

    #[rstest]
    fn credential_moves_to_resolving() {
        let state = AccessState::Unauthenticated.present(Some(UserId::new(7)));
        assert_eq!(state.pending_lookup(), Some(UserId::new(7)));
    }

    #[rstest]
    #[case(None, DenialReason::UnknownUser)]
    #[case(Some(record("member", "inactive")), DenialReason::Inactive)]
    #[case(Some(record("member", "pending")), DenialReason::Inactive)]
    #[case(Some(record("member", "frozen")), DenialReason::Inactive)]
    #[case(Some(record("overlord", "active")), DenialReason::UnrecognizedRole)]
    fn resolution_failures(#[case] found: Option<AccessRecord>, #[case] reason: DenialReason) {
        let state = AccessState::Resolving(UserId::new(7)).complete(found);
        assert_eq!(state, AccessState::Denied(reason));
    }

    #[rstest]
    fn mismatched_record_is_unknown() {
        let mut other = record("admin", "active");
        other.id = UserId::new(8);
        let state = AccessState::Resolving(UserId::new(7)).complete(Some(other));
        assert_eq!(state, AccessState::Denied(DenialReason::UnknownUser));
    }

    #[rstest]
    fn active_known_role_is_authorized() {
        let state = AccessState::Resolving(UserId::new(7)).complete(Some(record("bec", "active")));
        let identity = state.into_result().expect("authorized");
        assert_eq!(identity.role, Role::Bec);
        assert_eq!(identity.branch_id, Some(BranchId::new(2)));
    }

    #[rstest]
    fn terminal_states_do_not_transition() {
        let denied = AccessState::Denied(DenialReason::Inactive);
        assert_eq!(denied.present(Some(UserId::new(1))), denied);
        assert_eq!(denied.complete(Some(record("admin", "active"))), denied);

        let authorized = AccessState::Authorized(identity(Role::Member));
        assert_eq!(authorized.complete(None), authorized);
    }

    #[rstest]
    fn non_terminal_states_collapse_to_denials() {
        assert_eq!(
            AccessState::Unauthenticated.into_result(),
            Err(DenialReason::MissingCredential)
        );
        assert_eq!(
            AccessState::Resolving(UserId::new(1)).into_result(),
            Err(DenialReason::UnknownUser)
        );
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Nec, true)]
    #[case(Role::Bec, true)]
    #[case(Role::Member, false)]
    #[case(Role::Alumni, false)]
    #[case(Role::NecMember, false)]
    #[case(Role::BecMember, false)]
    fn executive_requirement(#[case] role: Role, #[case] allowed: bool) {
        let result = authorize(&identity(role), Requirement::AnyRole(EXECUTIVE_ROLES));
        assert_eq!(result.is_ok(), allowed);
    }

    #[rstest]
    fn self_or_roles_allows_the_subject() {
        let requirement = Requirement::SelfOrAnyRole {
            subject: UserId::new(7),
            roles: EXECUTIVE_ROLES,
        };
        assert!(authorize(&identity(Role::Member), requirement).is_ok());

        let other = Requirement::SelfOrAnyRole {
            subject: UserId::new(9),
            roles: EXECUTIVE_ROLES,
        };
        assert_eq!(
            authorize(&identity(Role::Member), other),
            Err(DenialReason::InsufficientRole)
        );
        assert!(authorize(&identity(Role::Nec), other).is_ok());
    }

    #[rstest]
    #[case(DenialReason::MissingCredential, ErrorCode::Unauthorized)]
    #[case(DenialReason::UnknownUser, ErrorCode::Unauthorized)]
    #[case(DenialReason::Inactive, ErrorCode::Forbidden)]
    #[case(DenialReason::UnrecognizedRole, ErrorCode::Forbidden)]
    #[case(DenialReason::InsufficientRole, ErrorCode::Forbidden)]
    fn denials_map_to_error_codes(#[case] reason: DenialReason, #[case] code: ErrorCode) {
        assert_eq!(reason.into_error().code(), code);
    }
}
