//! Tests for the account service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    LoginRecord, MockPasswordHasher, MockUserRepository, PasswordHashError, UserPersistenceError,
};
use crate::domain::{
    AccessRecord, AccountStatus, BranchId, DenialReason, ErrorCode, NewUser, Role,
};

type Service = AccountService<MockUserRepository, MockPasswordHasher>;

fn make_service(repo: MockUserRepository, hasher: MockPasswordHasher) -> Service {
    AccountService::new(Arc::new(repo), Arc::new(hasher))
}

#[fixture]
fn ada() -> User {
    User {
        id: UserId::new(7),
        name: "Ada".to_owned(),
        email: "ada@example.org".to_owned(),
        role: Role::Nec,
        branch_id: Some(BranchId::new(2)),
        is_bec_member: false,
        nec_position: Some("Secretary".to_owned()),
        bec_position: None,
        status: AccountStatus::Active,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("ada@example.org", "hunter2").expect("valid credentials")
}

fn repo_with_login(user: User) -> MockUserRepository {
    repo_with_record(LoginRecord::for_user(user, "$2b$hash"))
}

fn repo_with_record(record: LoginRecord) -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_login_record()
        .withf(|email| email == "ada@example.org")
        .times(1)
        .return_once(move |_| Ok(Some(record)));
    repo
}

/// Login record for a row written with role or status text outside the enums.
fn unparsed_record(role: &str, status: &str) -> LoginRecord {
    LoginRecord {
        access: AccessRecord {
            id: UserId::new(7),
            role: role.to_owned(),
            status: status.to_owned(),
            branch_id: None,
        },
        user: None,
        password_hash: "$2b$hash".to_owned(),
    }
}

fn hasher_verifying(result: bool) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, hash| password.expose() == "hunter2" && hash == "$2b$hash")
        .times(1)
        .return_once(move |_, _| Ok(result));
    hasher
}

#[rstest]
#[tokio::test]
async fn authenticate_returns_the_active_user(ada: User) {
    let service = make_service(repo_with_login(ada.clone()), hasher_verifying(true));

    let user = service.authenticate(&credentials()).await.expect("login succeeds");
    assert_eq!(user, ada);
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_wrong_password(ada: User) {
    let service = make_service(repo_with_login(ada), hasher_verifying(false));

    let err = service.authenticate(&credentials()).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_rejects_unknown_email_without_hashing() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_login_record()
        .times(1)
        .return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(0);
    let service = make_service(repo, hasher);

    let err = service.authenticate(&credentials()).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
}

#[rstest]
#[case(AccountStatus::Inactive)]
#[case(AccountStatus::Pending)]
#[tokio::test]
async fn authenticate_refuses_non_active_accounts(ada: User, #[case] status: AccountStatus) {
    let user = User { status, ..ada };
    let service = make_service(repo_with_login(user), hasher_verifying(true));

    let err = service.authenticate(&credentials()).await.expect_err("refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("account_inactive")
    );
}

#[tokio::test]
async fn authenticate_denies_unrecognised_stored_roles() {
    let service = make_service(
        repo_with_record(unparsed_record("superuser", "active")),
        hasher_verifying(true),
    );

    let err = service.authenticate(&credentials()).await.expect_err("denied");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "account role is not recognised");
}

#[tokio::test]
async fn authenticate_treats_unrecognised_status_as_inactive() {
    let service = make_service(
        repo_with_record(unparsed_record("member", "suspended")),
        hasher_verifying(true),
    );

    let err = service.authenticate(&credentials()).await.expect_err("denied");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("account_inactive")
    );
}

#[tokio::test]
async fn unrecognised_roles_still_need_the_right_password() {
    let service = make_service(
        repo_with_record(unparsed_record("superuser", "active")),
        hasher_verifying(false),
    );

    let err = service.authenticate(&credentials()).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_maps_connection_failures() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_login_record()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));
    let service = make_service(repo, MockPasswordHasher::new());

    let err = service.authenticate(&credentials()).await.expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn resolve_without_credential_skips_lookup() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_access_record().times(0);
    let service = make_service(repo, MockPasswordHasher::new());

    let state = service.resolve(None).await.expect("resolved");
    assert_eq!(state, AccessState::Denied(DenialReason::MissingCredential));
}

#[rstest]
#[case("admin", "active", None)]
#[case("admin", "inactive", Some(DenialReason::Inactive))]
#[case("wizard", "active", Some(DenialReason::UnrecognizedRole))]
#[tokio::test]
async fn resolve_walks_the_state_machine(
    #[case] role: &'static str,
    #[case] status: &'static str,
    #[case] denial: Option<DenialReason>,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_access_record()
        .withf(|id| *id == UserId::new(3))
        .times(1)
        .return_once(move |id| {
            Ok(Some(AccessRecord {
                id,
                role: role.to_owned(),
                status: status.to_owned(),
                branch_id: None,
            }))
        });
    let service = make_service(repo, MockPasswordHasher::new());

    let state = service.resolve(Some(UserId::new(3))).await.expect("resolved");
    match denial {
        Some(reason) => assert_eq!(state, AccessState::Denied(reason)),
        None => {
            let identity = state.into_result().expect("authorized");
            assert_eq!(identity.role, Role::Admin);
        }
    }
}

#[tokio::test]
async fn resolve_reports_deleted_accounts_as_unknown() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_access_record()
        .times(1)
        .return_once(|_| Ok(None));
    let service = make_service(repo, MockPasswordHasher::new());

    let state = service.resolve(Some(UserId::new(3))).await.expect("resolved");
    assert_eq!(state, AccessState::Denied(DenialReason::UnknownUser));
}

#[rstest]
#[tokio::test]
async fn create_user_hashes_before_insert(ada: User) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password.expose() == "hunter2")
        .times(1)
        .return_once(|_| Ok("$2b$hashed".to_owned()));
    let mut repo = MockUserRepository::new();
    let stored = ada.clone();
    repo.expect_insert()
        .withf(|new_user: &NewUser| {
            new_user.password_hash == "$2b$hashed" && new_user.profile.role == Role::Nec
        })
        .times(1)
        .return_once(move |_| Ok(stored));
    let service = make_service(repo, hasher);

    let draft = UserDraft::try_new(Some("Ada"), Some("ada@example.org"), Some("hunter2"))
        .expect("valid draft")
        .with_profile(UserProfile {
            role: Role::Nec,
            ..UserProfile::default()
        });
    let user = service.create_user(draft).await.expect("created");
    assert_eq!(user, ada);
}

#[rstest]
#[tokio::test]
async fn create_user_maps_duplicate_email_to_conflict(ada: User) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok("$2b$hashed".to_owned()));
    let mut repo = MockUserRepository::new();
    let email = ada.email.clone();
    repo.expect_insert()
        .times(1)
        .return_once(move |_| Err(UserPersistenceError::duplicate_email(email)));
    let service = make_service(repo, hasher);

    let draft = UserDraft::try_new(Some("Ada"), Some("ada@example.org"), Some("hunter2"))
        .expect("valid draft");
    let err = service.create_user(draft).await.expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn create_user_surfaces_hash_failures_without_insert() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Err(PasswordHashError::failed("cost out of range")));
    let mut repo = MockUserRepository::new();
    repo.expect_insert().times(0);
    let service = make_service(repo, hasher);

    let draft = UserDraft::try_new(Some("Ada"), Some("ada@example.org"), Some("hunter2"))
        .expect("valid draft");
    let err = service.create_user(draft).await.expect_err("internal");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn register_member_forces_member_defaults(ada: User) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok("$2b$hashed".to_owned()));
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .withf(|new_user: &NewUser| {
            new_user.profile.role == Role::Member
                && new_user.profile.status == AccountStatus::Active
                && !new_user.profile.is_bec_member
                && new_user.profile.nec_position.is_none()
                && new_user.profile.branch_id == Some(BranchId::new(2))
        })
        .times(1)
        .return_once(move |_| Ok(ada));
    let service = make_service(repo, hasher);

    let draft = UserDraft::try_new(Some("Ada"), Some("ada@example.org"), Some("hunter2"))
        .expect("valid draft")
        .with_profile(UserProfile {
            role: Role::Admin,
            branch_id: Some(BranchId::new(2)),
            is_bec_member: true,
            nec_position: Some("President".to_owned()),
            ..UserProfile::default()
        });
    service.register_member(draft).await.expect("registered");
}

#[tokio::test]
async fn update_user_reports_unknown_ids() {
    let mut repo = MockUserRepository::new();
    repo.expect_replace()
        .times(1)
        .return_once(|_, _| Ok(None));
    let service = make_service(repo, MockPasswordHasher::new());

    let replacement =
        UserReplacement::try_new(Some("Ada"), Some("ada@example.org"), UserProfile::default())
            .expect("valid replacement");
    let err = service
        .update_user(UserId::new(99), replacement)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn find_user_reports_unknown_ids() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    let service = make_service(repo, MockPasswordHasher::new());

    let err = service.find_user(UserId::new(5)).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
