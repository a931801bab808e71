//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use membership_portal::inbound::http::pages::StaticPages;
use membership_portal::inbound::http::session_config::SessionSettings;
use membership_portal::inbound::http::state::UploadPolicy;
use membership_portal::outbound::persistence::DbPool;
use membership_portal::outbound::storage::ObjectFileStore;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) files: Arc<ObjectFileStore>,
    pub(crate) pages: StaticPages,
    pub(crate) uploads: UploadPolicy,
    pub(crate) bcrypt_cost: u32,
}

impl ServerConfig {
    /// Construct a server configuration from the process-scoped resources.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        db_pool: DbPool,
        files: Arc<ObjectFileStore>,
        pages: StaticPages,
    ) -> Self {
        Self {
            session,
            bind_addr,
            db_pool,
            files,
            pages,
            uploads: UploadPolicy::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Replace the upload limits and addressing.
    #[must_use]
    pub fn with_upload_policy(mut self, uploads: UploadPolicy) -> Self {
        self.uploads = uploads;
        self
    }

    /// Replace the bcrypt work factor.
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}
