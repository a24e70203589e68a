//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod health;
pub mod results;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
