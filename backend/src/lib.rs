//! Membership portal backend.
//!
//! Hexagonal layout: `domain` holds entities, access rules and ports;
//! `inbound::http` adapts Actix requests onto driving ports; `outbound`
//! implements driven ports over PostgreSQL, object storage and bcrypt.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
