//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **storage**: uploaded documents in S3 or on the local filesystem
//! - **password**: bcrypt hashing on the blocking pool
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod password;
pub mod persistence;
pub mod storage;
