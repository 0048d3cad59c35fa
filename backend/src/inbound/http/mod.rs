//! HTTP inbound adapter exposing the blog's routes.
//!
//! Handlers translate requests into driving-port calls and map the results
//! onto JSON bodies, `302 Found` redirects, or [`crate::domain::Error`]
//! responses.

pub mod admin;
pub mod error;
pub mod feeds;
pub mod follows;
pub mod health;
pub mod posts;
pub mod redirect;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
