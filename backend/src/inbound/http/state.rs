//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AlumniRepository, BranchRepository, DashboardQuery, EventRepository, FileStore,
    IdentityResolver, LoginService, NewsRepository, UserCommand, UsersQuery,
};

/// Default cap on a single uploaded document.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Most documents accepted by one multi-file upload.
pub const MAX_FILES_PER_UPLOAD: usize = 5;

/// Limits and addressing for document uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Largest accepted file, in bytes.
    pub max_file_bytes: usize,
    /// Largest number of files in one multi-file upload.
    pub max_files: usize,
    /// Public URL prefix of the bucket. When unset, `location` points back at
    /// the download endpoint.
    pub public_base_url: Option<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_files: MAX_FILES_PER_UPLOAD,
            public_base_url: None,
        }
    }
}

impl UploadPolicy {
    /// Where clients can fetch the object stored under `key`.
    ///
    /// # Examples
    /// ```
    /// use membership_portal::inbound::http::state::UploadPolicy;
    ///
    /// let local = UploadPolicy::default();
    /// assert_eq!(local.location_for("abc-notes.pdf"), "/api/file/abc-notes.pdf");
    ///
    /// let bucket = UploadPolicy {
    ///     public_base_url: Some("https://docs.example.org/".into()),
    ///     ..UploadPolicy::default()
    /// };
    /// assert_eq!(bucket.location_for("abc-notes.pdf"), "https://docs.example.org/abc-notes.pdf");
    /// ```
    pub fn location_for(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{key}", base.trim_end_matches('/')),
            None => format!("/api/file/{key}"),
        }
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub users: Arc<dyn UsersQuery>,
    pub user_commands: Arc<dyn UserCommand>,
    pub branches: Arc<dyn BranchRepository>,
    pub events: Arc<dyn EventRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub files: Arc<dyn FileStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub users: Arc<dyn UsersQuery>,
    pub user_commands: Arc<dyn UserCommand>,
    pub branches: Arc<dyn BranchRepository>,
    pub events: Arc<dyn EventRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub files: Arc<dyn FileStore>,
    pub clock: Arc<dyn Clock>,
    pub uploads: UploadPolicy,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle with the system clock and the
    /// default upload policy.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            identity,
            users,
            user_commands,
            branches,
            events,
            news,
            alumni,
            dashboard,
            files,
        } = ports;
        Self {
            login,
            identity,
            users,
            user_commands,
            branches,
            events,
            news,
            alumni,
            dashboard,
            files,
            clock: Arc::new(DefaultClock),
            uploads: UploadPolicy::default(),
        }
    }

    /// Replace the clock used for server-side defaults such as publish dates.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the upload policy.
    #[must_use]
    pub fn with_upload_policy(mut self, uploads: UploadPolicy) -> Self {
        self.uploads = uploads;
        self
    }
}
