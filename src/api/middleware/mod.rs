//! API middleware components

pub mod admin_auth;
pub mod logging;
pub mod metrics;
pub mod security;
pub mod user_auth;

use axum::{body::Body, extract::MatchedPath, http::Request};

pub use admin_auth::RequireAdmin;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
pub use user_auth::RequireUser;

/// Route template (`/users/{id}`) when matched, raw path otherwise
fn route_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
