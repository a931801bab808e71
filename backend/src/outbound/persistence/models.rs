//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the rows so every adapter parses stored text the same way.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{
    AccessRecord, AccountStatus, Alumnus, Branch, BranchDraft, BranchId, DashboardCounts, Event,
    NewAlumnus, NewEvent, NewNews, NewUser, News, Role, StatsSnapshot, User, UserId,
    UserReplacement,
};

use super::schema::{alumni, branches, events, news, stats_snapshots, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Public columns of the users table; the password hash is excluded.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub branch_id: Option<i32>,
    pub is_bec_member: bool,
    pub nec_position: Option<String>,
    pub bec_position: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored text that does not parse into a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {id} has unrecognised {column} value {value:?}")]
pub(crate) struct InvalidStoredValue {
    pub id: i32,
    pub column: &'static str,
    pub value: String,
}

impl TryFrom<UserRow> for User {
    type Error = InvalidStoredValue;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|_| InvalidStoredValue {
            id: row.id,
            column: "role",
            value: row.role.clone(),
        })?;
        let status = row
            .status
            .parse::<AccountStatus>()
            .map_err(|_| InvalidStoredValue {
                id: row.id,
                column: "status",
                value: row.status.clone(),
            })?;
        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            role,
            branch_id: row.branch_id.map(BranchId::new),
            is_bec_member: row.is_bec_member,
            nec_position: row.nec_position,
            bec_position: row.bec_position,
            status,
            created_at: row.created_at,
        })
    }
}

/// User columns plus the password hash, read only by the login lookup.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoginRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

/// Raw access attributes consumed by identity resolution.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccessRow {
    pub id: i32,
    pub role: String,
    pub status: String,
    pub branch_id: Option<i32>,
}

impl From<AccessRow> for AccessRecord {
    fn from(row: AccessRow) -> Self {
        Self {
            id: UserId::new(row.id),
            role: row.role,
            status: row.status,
            branch_id: row.branch_id.map(BranchId::new),
        }
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub status: &'a str,
    pub branch_id: Option<i32>,
    pub is_bec_member: bool,
    pub nec_position: Option<&'a str>,
    pub bec_position: Option<&'a str>,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            name: &user.name,
            email: &user.email,
            password_hash: &user.password_hash,
            role: user.profile.role.as_str(),
            status: user.profile.status.as_str(),
            branch_id: user.profile.branch_id.map(BranchId::get),
            is_bec_member: user.profile.is_bec_member,
            nec_position: user.profile.nec_position.as_deref(),
            bec_position: user.profile.bec_position.as_deref(),
        }
    }
}

/// Full-row replacement of editable user columns. `None` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserReplacementRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub status: &'a str,
    pub branch_id: Option<i32>,
    pub is_bec_member: bool,
    pub nec_position: Option<&'a str>,
    pub bec_position: Option<&'a str>,
}

impl<'a> From<&'a UserReplacement> for UserReplacementRow<'a> {
    fn from(replacement: &'a UserReplacement) -> Self {
        let profile = &replacement.profile;
        Self {
            name: &replacement.name,
            email: &replacement.email,
            role: profile.role.as_str(),
            status: profile.status.as_str(),
            branch_id: profile.branch_id.map(BranchId::get),
            is_bec_member: profile.is_bec_member,
            nec_position: profile.nec_position.as_deref(),
            bec_position: profile.bec_position.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = branches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BranchRow {
    pub id: i32,
    pub name: String,
    pub university: Option<String>,
    pub province: Option<String>,
    pub member_count: i32,
    pub alumni_count: i32,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Self {
            id: BranchId::new(row.id),
            name: row.name,
            university: row.university,
            province: row.province,
            member_count: row.member_count,
            alumni_count: row.alumni_count,
        }
    }
}

/// Insert and full-row replacement payload for branches.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = branches)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BranchWriteRow<'a> {
    pub name: &'a str,
    pub university: Option<&'a str>,
    pub province: Option<&'a str>,
    pub member_count: i32,
    pub alumni_count: i32,
}

impl<'a> From<&'a BranchDraft> for BranchWriteRow<'a> {
    fn from(draft: &'a BranchDraft) -> Self {
        Self {
            name: &draft.name,
            university: draft.university.as_deref(),
            province: draft.province.as_deref(),
            member_count: draft.member_count,
            alumni_count: draft.alumni_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i32,
    pub title: String,
    pub date: DateTime<Utc>,
    pub branch_id: i32,
    pub created_by: i32,
    pub event_type: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            date: row.date,
            branch_id: BranchId::new(row.branch_id),
            created_by: UserId::new(row.created_by),
            event_type: row.event_type,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub title: &'a str,
    pub date: DateTime<Utc>,
    pub branch_id: i32,
    pub created_by: i32,
    pub event_type: &'a str,
}

impl<'a> From<&'a NewEvent> for NewEventRow<'a> {
    fn from(event: &'a NewEvent) -> Self {
        Self {
            title: &event.title,
            date: event.date,
            branch_id: event.branch_id.get(),
            created_by: event.created_by.get(),
            event_type: &event.event_type,
        }
    }
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = news)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NewsRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub branch_id: i32,
    pub author_id: i32,
    pub publish_date: DateTime<Utc>,
}

impl From<NewsRow> for News {
    fn from(row: NewsRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            branch_id: BranchId::new(row.branch_id),
            author_id: UserId::new(row.author_id),
            publish_date: row.publish_date,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = news)]
pub(crate) struct NewNewsRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub branch_id: i32,
    pub author_id: i32,
    pub publish_date: DateTime<Utc>,
}

impl<'a> From<&'a NewNews> for NewNewsRow<'a> {
    fn from(item: &'a NewNews) -> Self {
        Self {
            title: &item.title,
            content: &item.content,
            branch_id: item.branch_id.get(),
            author_id: item.author_id.get(),
            publish_date: item.publish_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Alumni
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = alumni)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AlumnusRow {
    pub id: i32,
    pub user_id: i32,
    pub branch_id: i32,
    pub graduation_date: NaiveDate,
    pub degree: String,
    pub current_status: String,
}

impl From<AlumnusRow> for Alumnus {
    fn from(row: AlumnusRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::new(row.user_id),
            branch_id: BranchId::new(row.branch_id),
            graduation_date: row.graduation_date,
            degree: row.degree,
            current_status: row.current_status,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = alumni)]
pub(crate) struct NewAlumnusRow<'a> {
    pub user_id: i32,
    pub branch_id: i32,
    pub graduation_date: NaiveDate,
    pub degree: &'a str,
    pub current_status: &'a str,
}

impl<'a> From<&'a NewAlumnus> for NewAlumnusRow<'a> {
    fn from(alumnus: &'a NewAlumnus) -> Self {
        Self {
            user_id: alumnus.user_id.get(),
            branch_id: alumnus.branch_id.get(),
            graduation_date: alumnus.graduation_date,
            degree: &alumnus.degree,
            current_status: &alumnus.current_status,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stats_snapshots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StatsSnapshotRow {
    pub id: i32,
    pub captured_at: DateTime<Utc>,
    pub total_users: i64,
    pub total_events: i64,
    pub total_branches: i64,
    pub total_alumni: i64,
    pub total_news: i64,
    pub active_users: i64,
    pub upcoming_events: i64,
}

impl From<StatsSnapshotRow> for StatsSnapshot {
    fn from(row: StatsSnapshotRow) -> Self {
        Self {
            id: row.id,
            captured_at: row.captured_at,
            counts: DashboardCounts {
                total_users: row.total_users,
                total_events: row.total_events,
                total_branches: row.total_branches,
                total_alumni: row.total_alumni,
                total_news: row.total_news,
                active_users: row.active_users,
                upcoming_events: row.upcoming_events,
            },
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stats_snapshots)]
pub(crate) struct NewStatsSnapshotRow {
    pub captured_at: DateTime<Utc>,
    pub total_users: i64,
    pub total_events: i64,
    pub total_branches: i64,
    pub total_alumni: i64,
    pub total_news: i64,
    pub active_users: i64,
    pub upcoming_events: i64,
}

impl NewStatsSnapshotRow {
    pub fn new(counts: &DashboardCounts, captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            total_users: counts.total_users,
            total_events: counts.total_events,
            total_branches: counts.total_branches,
            total_alumni: counts.total_alumni,
            total_news: counts.total_news,
            active_users: counts.active_users,
            upcoming_events: counts.upcoming_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn user_row(role: &str, status: &str) -> UserRow {
        UserRow {
            id: 4,
            name: "Ada".to_owned(),
            email: "ada@example.org".to_owned(),
            role: role.to_owned(),
            status: status.to_owned(),
            branch_id: Some(1),
            is_bec_member: true,
            nec_position: None,
            bec_position: Some("Treasurer".to_owned()),
            created_at: Utc
                .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn user_row_converts_known_values() {
        let user = User::try_from(user_row("bec_member", "pending")).expect("valid row");
        assert_eq!(user.role, Role::BecMember);
        assert_eq!(user.status, AccountStatus::Pending);
        assert_eq!(user.branch_id, Some(BranchId::new(1)));
    }

    #[rstest]
    #[case("overlord", "active", "role")]
    #[case("member", "suspended", "status")]
    fn user_row_rejects_unknown_text(
        #[case] role: &str,
        #[case] status: &str,
        #[case] column: &str,
    ) {
        let err = User::try_from(user_row(role, status)).expect_err("invalid row");
        assert_eq!(err.column, column);
        assert_eq!(err.id, 4);
    }

    #[rstest]
    fn replacement_row_writes_nulls_for_cleared_positions() {
        let replacement = UserReplacement::try_new(
            Some("Ada"),
            Some("ada@example.org"),
            crate::domain::UserProfile::default(),
        )
        .expect("valid replacement");
        let row = UserReplacementRow::from(&replacement);
        assert_eq!(row.nec_position, None);
        assert_eq!(row.role, "member");
        assert_eq!(row.status, "active");
    }
}
