//! Builders wiring the Diesel repositories into HTTP handler state.

use std::sync::Arc;

use mockable::DefaultClock;

use membership_portal::domain::dashboard_service::DashboardSources;
use membership_portal::domain::{AccountService, DashboardService};
use membership_portal::inbound::http::state::{HttpState, HttpStatePorts};
use membership_portal::outbound::password::BcryptPasswordHasher;
use membership_portal::outbound::persistence::{
    DbPool, DieselAlumniRepository, DieselBranchRepository, DieselEventRepository,
    DieselNewsRepository, DieselStatsRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repositories sharing one pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    branches: Arc<DieselBranchRepository>,
    events: Arc<DieselEventRepository>,
    news: Arc<DieselNewsRepository>,
    alumni: Arc<DieselAlumniRepository>,
    stats: Arc<DieselStatsRepository>,
}

impl Repositories {
    fn over(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            branches: Arc::new(DieselBranchRepository::new(pool.clone())),
            events: Arc::new(DieselEventRepository::new(pool.clone())),
            news: Arc::new(DieselNewsRepository::new(pool.clone())),
            alumni: Arc::new(DieselAlumniRepository::new(pool.clone())),
            stats: Arc::new(DieselStatsRepository::new(pool.clone())),
        }
    }
}

fn build_dashboard(repos: &Repositories) -> Arc<DashboardService> {
    Arc::new(DashboardService::new(
        DashboardSources {
            users: repos.users.clone(),
            branches: repos.branches.clone(),
            events: repos.events.clone(),
            news: repos.news.clone(),
            alumni: repos.alumni.clone(),
            stats: repos.stats.clone(),
        },
        Arc::new(DefaultClock),
    ))
}

/// Assemble handler state over the database pool configured in `config`.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let repos = Repositories::over(&config.db_pool);
    let accounts = Arc::new(AccountService::new(
        repos.users.clone(),
        Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
    ));
    let dashboard = build_dashboard(&repos);

    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        identity: accounts.clone(),
        users: accounts.clone(),
        user_commands: accounts,
        branches: repos.branches,
        events: repos.events,
        news: repos.news,
        alumni: repos.alumni,
        dashboard,
        files: config.files.clone(),
    })
    .with_upload_policy(config.uploads.clone())
}
