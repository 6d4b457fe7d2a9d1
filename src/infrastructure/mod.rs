//! Infrastructure layer - External service implementations

pub mod auth;
pub mod logging;
pub mod observability;
pub mod user;
pub mod user_config;
