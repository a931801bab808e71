//! Backend entry-point: loads settings, prepares the database and storage,
//! then serves the portal pages, REST API and OpenAPI docs.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use membership_portal::inbound::http::health::HealthState;
use membership_portal::inbound::http::pages::StaticPages;
use membership_portal::inbound::http::session_config::{BuildMode, session_settings_from_env};
use membership_portal::outbound::persistence::{DbPool, run_pending_migrations};
use membership_portal::outbound::storage::ObjectFileStore;
use membership_portal::settings::{AppSettings, StorageTarget};
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

fn build_file_store(settings: &AppSettings) -> io::Result<ObjectFileStore> {
    let store = match settings.storage() {
        StorageTarget::Bucket { name, endpoint } => {
            info!(bucket = %name, "storing documents in S3");
            ObjectFileStore::s3(&name, endpoint.as_deref())
        }
        StorageTarget::Local(root) => {
            warn!(root = %root.display(), "no S3 bucket configured; storing documents locally");
            ObjectFileStore::local(&root)
        }
    };
    store.map_err(|error| io::Error::other(format!("configure document storage: {error}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|error| io::Error::other(format!("session configuration: {error}")))?;

    let pool_config = settings
        .pool_config()
        .map_err(|error| io::Error::other(format!("database settings: {error}")))?;
    if settings.run_migrations {
        let applied = run_pending_migrations(pool_config.database_url())
            .await
            .map_err(|error| io::Error::other(error.to_string()))?;
        info!(count = applied.len(), versions = ?applied, "migrations applied");
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let files = Arc::new(build_file_store(&settings)?);
    let static_dir = settings.static_dir();
    let pages = StaticPages::open(&static_dir).map_err(|error| {
        io::Error::other(format!(
            "open static directory {}: {error}",
            static_dir.display()
        ))
    })?;

    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(session, bind_addr, pool, files, pages)
        .with_upload_policy(settings.upload_policy())
        .with_bcrypt_cost(settings.bcrypt_cost());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}
