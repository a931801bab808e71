//! Dashboard statistics.
//!
//! Three concerns live here:
//! - [`DashboardCounts`], the seven row counts computed by the database;
//! - the summary reducers, pure functions over entity collections that take
//!   `now` explicitly;
//! - trends, comparing current counts with the latest persisted
//!   [`StatsSnapshot`].

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountStatus, Alumnus, Branch, BranchId, Event, News, User};

/// Window used for the "new members" metric.
pub const NEW_MEMBER_WINDOW_DAYS: i64 = 30;

/// Row counts shown on every dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    /// All accounts.
    pub total_users: i64,
    /// All events.
    pub total_events: i64,
    /// All branches.
    pub total_branches: i64,
    /// All alumni records.
    pub total_alumni: i64,
    /// All news articles.
    pub total_news: i64,
    /// Accounts whose status is `active`.
    pub active_users: i64,
    /// Events dated after the query time.
    pub upcoming_events: i64,
}

/// Persisted copy of [`DashboardCounts`] used as a trend baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Row identifier.
    pub id: i32,
    /// When the counts were captured.
    pub captured_at: DateTime<Utc>,
    /// The captured counts.
    #[serde(flatten)]
    pub counts: DashboardCounts,
}

/// Member metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// All accounts.
    pub total: usize,
    /// Accounts with status `active`.
    pub active: usize,
    /// Accounts flagged as branch executive members.
    pub bec_members: usize,
    /// Accounts holding a national executive portfolio.
    pub nec_members: usize,
    /// Accounts created within [`NEW_MEMBER_WINDOW_DAYS`].
    pub new_last_30_days: usize,
}

/// Event metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// All events.
    pub total: usize,
    /// Events dated after now.
    pub upcoming: usize,
    /// Events in the current calendar month.
    pub this_month: usize,
}

/// Branch with the largest membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopBranch {
    /// Branch identifier.
    pub id: BranchId,
    /// Branch name.
    pub name: String,
    /// Member headcount.
    pub member_count: i32,
}

/// Branch metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    /// All branches.
    pub total: usize,
    /// Sum of member headcounts.
    pub total_members: i64,
    /// Members per branch, rounded to the nearest whole member.
    pub average_members: i64,
    /// Largest branch; the first one wins ties.
    pub top_branch: Option<TopBranch>,
}

/// Alumni metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlumniSummary {
    /// All alumni.
    pub total: usize,
    /// Alumni graduating in the current calendar year.
    pub graduated_this_year: usize,
    /// Percentage whose status is `employed`, case-insensitively.
    pub employment_rate: f64,
    /// Mean graduation year, rounded; absent without alumni.
    pub average_graduation_year: Option<i32>,
}

/// News metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    /// All articles.
    pub total: usize,
    /// Articles published in the current calendar month.
    pub this_month: usize,
    /// Distinct authors.
    pub distinct_authors: usize,
    /// Articles per distinct author.
    pub average_per_author: f64,
}

/// Every summary metric.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Member metrics.
    pub users: UserSummary,
    /// Event metrics.
    pub events: EventSummary,
    /// Branch metrics.
    pub branches: BranchSummary,
    /// Alumni metrics.
    pub alumni: AlumniSummary,
    /// News metrics.
    pub news: NewsSummary,
}

/// Borrowed entity collections fed to [`DashboardSummary::compute`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryInputs<'a> {
    /// Member accounts.
    pub users: &'a [User],
    /// Events.
    pub events: &'a [Event],
    /// Branches.
    pub branches: &'a [Branch],
    /// Alumni.
    pub alumni: &'a [Alumnus],
    /// News articles.
    pub news: &'a [News],
}

impl DashboardSummary {
    /// Run every reducer against `inputs` at time `now`.
    pub fn compute(inputs: SummaryInputs<'_>, now: DateTime<Utc>) -> Self {
        Self {
            users: summarise_users(inputs.users, now),
            events: summarise_events(inputs.events, now),
            branches: summarise_branches(inputs.branches),
            alumni: summarise_alumni(inputs.alumni, now),
            news: summarise_news(inputs.news, now),
        }
    }
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Summarise member accounts.
pub fn summarise_users(users: &[User], now: DateTime<Utc>) -> UserSummary {
    let cutoff = now - Duration::days(NEW_MEMBER_WINDOW_DAYS);
    UserSummary {
        total: users.len(),
        active: users
            .iter()
            .filter(|user| user.status == AccountStatus::Active)
            .count(),
        bec_members: users.iter().filter(|user| user.is_bec_member).count(),
        nec_members: users
            .iter()
            .filter(|user| user.nec_position.as_deref().is_some_and(|p| !p.is_empty()))
            .count(),
        new_last_30_days: users.iter().filter(|user| user.created_at > cutoff).count(),
    }
}

/// Summarise events.
pub fn summarise_events(events: &[Event], now: DateTime<Utc>) -> EventSummary {
    EventSummary {
        total: events.len(),
        upcoming: events.iter().filter(|event| event.date > now).count(),
        this_month: events
            .iter()
            .filter(|event| same_month(event.date, now))
            .count(),
    }
}

/// Summarise branches.
pub fn summarise_branches(branches: &[Branch]) -> BranchSummary {
    let total_members: i64 = branches
        .iter()
        .map(|branch| i64::from(branch.member_count))
        .sum();
    let divisor = i64::try_from(branches.len().max(1)).unwrap_or(i64::MAX);
    let top_branch = branches
        .iter()
        .fold(None::<&Branch>, |best, branch| match best {
            Some(current) if current.member_count >= branch.member_count => Some(current),
            _ => Some(branch),
        })
        .map(|branch| TopBranch {
            id: branch.id,
            name: branch.name.clone(),
            member_count: branch.member_count,
        });
    BranchSummary {
        total: branches.len(),
        total_members,
        average_members: rounded_div(total_members, divisor),
        top_branch,
    }
}

/// Integer division rounding half away from zero.
fn rounded_div(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator / divisor;
    let remainder = numerator % divisor;
    if remainder.abs() * 2 >= divisor.abs() {
        quotient + numerator.signum() * divisor.signum()
    } else {
        quotient
    }
}

/// Summarise alumni.
pub fn summarise_alumni(alumni: &[Alumnus], now: DateTime<Utc>) -> AlumniSummary {
    let employed = alumni
        .iter()
        .filter(|alum| alum.current_status.eq_ignore_ascii_case("employed"))
        .count();
    let average_graduation_year = if alumni.is_empty() {
        None
    } else {
        let sum: i64 = alumni
            .iter()
            .map(|alum| i64::from(alum.graduation_date.year()))
            .sum();
        let count = i64::try_from(alumni.len()).unwrap_or(i64::MAX);
        i32::try_from(rounded_div(sum, count)).ok()
    };
    AlumniSummary {
        total: alumni.len(),
        graduated_this_year: alumni
            .iter()
            .filter(|alum| alum.graduation_date.year() == now.year())
            .count(),
        employment_rate: ratio(employed, alumni.len()) * 100.0,
        average_graduation_year,
    }
}

/// Summarise news articles.
pub fn summarise_news(news: &[News], now: DateTime<Utc>) -> NewsSummary {
    let authors: HashSet<_> = news.iter().map(|item| item.author_id).collect();
    NewsSummary {
        total: news.len(),
        this_month: news
            .iter()
            .filter(|item| same_month(item.publish_date, now))
            .count(),
        distinct_authors: authors.len(),
        average_per_author: ratio(news.len(), authors.len()),
    }
}

/// Change of one metric against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrend {
    /// Current value.
    pub current: i64,
    /// Baseline value, when a snapshot exists.
    pub baseline: Option<i64>,
    /// `(current - baseline) / baseline * 100`; absent without a non-zero
    /// baseline.
    pub change_percent: Option<f64>,
}

impl MetricTrend {
    /// Compare `current` with an optional baseline.
    ///
    /// # Examples
    /// ```
    /// use membership_portal::domain::MetricTrend;
    ///
    /// assert_eq!(MetricTrend::between(120, Some(100)).change_percent, Some(20.0));
    /// assert_eq!(MetricTrend::between(5, Some(0)).change_percent, None);
    /// assert_eq!(MetricTrend::between(5, None).change_percent, None);
    /// ```
    pub fn between(current: i64, baseline: Option<i64>) -> Self {
        let change_percent = baseline
            .filter(|base| *base != 0)
            .map(|base| (current - base) as f64 / base as f64 * 100.0);
        Self {
            current,
            baseline,
            change_percent,
        }
    }
}

/// Trends for every dashboard count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTrends {
    /// Capture time of the baseline snapshot.
    pub baseline_captured_at: Option<DateTime<Utc>>,
    /// Account total.
    pub total_users: MetricTrend,
    /// Event total.
    pub total_events: MetricTrend,
    /// Branch total.
    pub total_branches: MetricTrend,
    /// Alumni total.
    pub total_alumni: MetricTrend,
    /// News total.
    pub total_news: MetricTrend,
    /// Active accounts.
    pub active_users: MetricTrend,
    /// Upcoming events.
    pub upcoming_events: MetricTrend,
}

impl DashboardTrends {
    /// Compare `current` against the snapshot, if any.
    pub fn compute(current: &DashboardCounts, baseline: Option<&StatsSnapshot>) -> Self {
        let base = baseline.map(|snapshot| snapshot.counts);
        let pick = |f: fn(&DashboardCounts) -> i64| {
            MetricTrend::between(f(current), base.as_ref().map(f))
        };
        Self {
            baseline_captured_at: baseline.map(|snapshot| snapshot.captured_at),
            total_users: pick(|c| c.total_users),
            total_events: pick(|c| c.total_events),
            total_branches: pick(|c| c.total_branches),
            total_alumni: pick(|c| c.total_alumni),
            total_news: pick(|c| c.total_news),
            active_users: pick(|c| c.active_users),
            upcoming_events: pick(|c| c.upcoming_events),
        }
    }
}
