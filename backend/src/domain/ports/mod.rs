//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`FileStore`], [`PasswordHasher`]) are
//! implemented by outbound adapters; driving ports ([`LoginService`],
//! [`IdentityResolver`], [`UsersQuery`], [`UserCommand`],
//! [`DashboardQuery`]) are implemented by domain services and called by the
//! HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod dashboard_query;
mod error_mapping;
mod file_store;
mod identity_resolver;
mod login_service;
mod password_hasher;
mod record_repositories;
mod stats_repository;
mod user_command;
mod user_repository;

#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::DashboardQuery;
pub use error_mapping::{
    map_file_store_error, map_password_hash_error, map_record_error, map_stats_error,
    map_user_persistence_error,
};
#[cfg(test)]
pub use file_store::MockFileStore;
pub use file_store::{FileStore, FileStoreError, FileUpload, StoredFile};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use record_repositories::{
    MockAlumniRepository, MockBranchRepository, MockEventRepository, MockNewsRepository,
};
pub use record_repositories::{
    AlumniRepository, BranchRepository, EventRepository, NewsRepository, RecordPersistenceError,
};
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
pub use stats_repository::{StatsRepository, StatsRepositoryError};
#[cfg(test)]
pub use user_command::{MockUserCommand, MockUsersQuery};
pub use user_command::{UserCommand, UsersQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{LoginRecord, UserPersistenceError, UserRepository};
