//! Role-to-dashboard routing.
//!
//! Each role owns exactly one dashboard. A dashboard answers to one canonical
//! path plus a few aliases (hyphenated and `.html` spellings); aliases and the
//! generic `/dashboard` entry redirect to the canonical path, while a
//! dashboard owned by a different role is refused outright.

use crate::domain::Role;

/// Generic entry point that redirects to the caller's own dashboard.
pub const GENERIC_DASHBOARD_PATH: &str = "/dashboard";

/// A dashboard view served as a static page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dashboard {
    /// General national membership view.
    General,
    /// National executive committee view.
    Nec,
    /// Branch executive committee view.
    Bec,
    /// Alumni view.
    Alumni,
    /// Administrator statistics view.
    Stats,
}

impl Dashboard {
    /// Every dashboard.
    pub const ALL: [Dashboard; 5] = [
        Self::General,
        Self::Nec,
        Self::Bec,
        Self::Alumni,
        Self::Stats,
    ];

    /// The single dashboard governed by `role`.
    ///
    /// # Examples
    /// ```
    /// use membership_portal::domain::{Dashboard, Role};
    ///
    /// assert_eq!(Dashboard::for_role(Role::Admin).canonical_path(), "/stats");
    /// assert_eq!(Dashboard::for_role(Role::BecMember), Dashboard::General);
    /// ```
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Member | Role::NecMember | Role::BecMember => Self::General,
            Role::Nec => Self::Nec,
            Role::Bec => Self::Bec,
            Role::Alumni => Self::Alumni,
            Role::Admin => Self::Stats,
        }
    }

    /// Path the dashboard is served from.
    pub const fn canonical_path(self) -> &'static str {
        match self {
            Self::General => "/gnm_dashboard",
            Self::Nec => "/nec_dashboard",
            Self::Bec => "/bec_dashboard",
            Self::Alumni => "/alumni_dashboard",
            Self::Stats => "/stats",
        }
    }

    /// Alternative spellings that redirect to [`Self::canonical_path`].
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::General => &["/gnm-dashboard", "/gnm_dashboard.html", "/gnm-dashboard.html"],
            Self::Nec => &["/nec-dashboard", "/nec_dashboard.html", "/nec-dashboard.html"],
            Self::Bec => &["/bec-dashboard", "/bec_dashboard.html", "/bec-dashboard.html"],
            Self::Alumni => &[
                "/alumni-dashboard",
                "/alumni_dashboard.html",
                "/alumni-dashboard.html",
            ],
            Self::Stats => &["/stats.html"],
        }
    }

    /// Static page file rendering the dashboard.
    pub const fn page_file(self) -> &'static str {
        match self {
            Self::General => "gnm_dashboard.html",
            Self::Nec => "nec_dashboard.html",
            Self::Bec => "bec_dashboard.html",
            Self::Alumni => "alumni_dashboard.html",
            Self::Stats => "stats.html",
        }
    }

    /// Find the dashboard answering to `path`, canonical or alias.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dashboard| {
                dashboard.canonical_path() == path || dashboard.aliases().contains(&path)
            })
    }

    /// Every path a dashboard answers to, plus the generic entry point.
    pub fn all_paths() -> impl Iterator<Item = &'static str> {
        std::iter::once(GENERIC_DASHBOARD_PATH).chain(
            Self::ALL
                .into_iter()
                .flat_map(|dashboard| {
                    std::iter::once(dashboard.canonical_path())
                        .chain(dashboard.aliases().iter().copied())
                }),
        )
    }
}

/// Outcome of routing a dashboard request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardRoute {
    /// Serve the dashboard page.
    Proceed(Dashboard),
    /// Redirect to the dashboard's canonical path.
    Redirect(Dashboard),
    /// The path belongs to another role's dashboard.
    Forbidden,
    /// The path is not a dashboard route.
    NotDashboard,
}

/// Decide what a request for `path` by `role` should do.
///
/// # Examples
/// ```
/// use membership_portal::domain::{route_dashboard, Dashboard, DashboardRoute, Role};
///
/// assert_eq!(
///     route_dashboard(Role::Nec, "/dashboard"),
///     DashboardRoute::Redirect(Dashboard::Nec),
/// );
/// assert_eq!(route_dashboard(Role::Member, "/nec_dashboard"), DashboardRoute::Forbidden);
/// ```
pub fn route_dashboard(role: Role, path: &str) -> DashboardRoute {
    let own = Dashboard::for_role(role);
    if path == GENERIC_DASHBOARD_PATH {
        return DashboardRoute::Redirect(own);
    }
    match Dashboard::from_path(path) {
        Some(requested) if requested != own => DashboardRoute::Forbidden,
        Some(requested) if path == requested.canonical_path() => DashboardRoute::Proceed(requested),
        Some(requested) => DashboardRoute::Redirect(requested),
        None => DashboardRoute::NotDashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(Role::Member, "/gnm_dashboard")]
    #[case(Role::Nec, "/nec_dashboard")]
    #[case(Role::Bec, "/bec_dashboard")]
    #[case(Role::Alumni, "/alumni_dashboard")]
    #[case(Role::Admin, "/stats")]
    #[case(Role::NecMember, "/gnm_dashboard")]
    #[case(Role::BecMember, "/gnm_dashboard")]
    fn every_role_has_one_canonical_path(#[case] role: Role, #[case] path: &str) {
        assert_eq!(Dashboard::for_role(role).canonical_path(), path);
        assert_eq!(
            route_dashboard(role, path),
            DashboardRoute::Proceed(Dashboard::for_role(role))
        );
    }

    #[rstest]
    fn foreign_dashboards_are_forbidden() {
        let primary = [Role::Member, Role::Nec, Role::Bec, Role::Alumni];
        for role in primary {
            for other in primary {
                if Dashboard::for_role(role) == Dashboard::for_role(other) {
                    continue;
                }
                let path = Dashboard::for_role(other).canonical_path();
                assert_eq!(
                    route_dashboard(role, path),
                    DashboardRoute::Forbidden,
                    "{role} -> {path}"
                );
            }
        }
    }

    #[rstest]
    fn foreign_aliases_are_forbidden_not_redirected() {
        assert_eq!(route_dashboard(Role::Alumni, "/nec-dashboard"), DashboardRoute::Forbidden);
    }

    #[rstest]
    #[case(Role::Nec, "/nec-dashboard")]
    #[case(Role::Bec, "/bec_dashboard.html")]
    #[case(Role::Alumni, "/alumni-dashboard.html")]
    #[case(Role::Member, "/gnm-dashboard")]
    #[case(Role::Admin, "/stats.html")]
    fn own_aliases_redirect_to_canonical(#[case] role: Role, #[case] path: &str) {
        assert_eq!(
            route_dashboard(role, path),
            DashboardRoute::Redirect(Dashboard::for_role(role))
        );
    }

    #[rstest]
    fn generic_entry_redirects_every_role() {
        for role in Role::ALL {
            assert_eq!(
                route_dashboard(role, GENERIC_DASHBOARD_PATH),
                DashboardRoute::Redirect(Dashboard::for_role(role))
            );
        }
    }

    #[rstest]
    fn unrelated_paths_are_not_dashboards() {
        assert_eq!(route_dashboard(Role::Admin, "/signin"), DashboardRoute::NotDashboard);
    }

    #[rstest]
    fn routing_is_idempotent() {
        for path in Dashboard::all_paths() {
            assert_eq!(route_dashboard(Role::Bec, path), route_dashboard(Role::Bec, path));
        }
    }

    #[rstest]
    fn all_paths_are_unique() {
        let paths: Vec<_> = Dashboard::all_paths().collect();
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(paths.len(), unique.len());
    }
}
