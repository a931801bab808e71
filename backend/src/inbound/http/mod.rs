//! HTTP inbound adapter exposing the REST API and the browser pages.

pub mod alumni;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod health;
pub mod identity;
pub mod news;
pub mod pages;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod users;
pub mod validation;

pub use error::ApiResult;
