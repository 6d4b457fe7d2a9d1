//! Bearer token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::Principal;
use crate::domain::DomainError;

/// Extractor that requires a valid JWT in `Authorization: Bearer <token>`.
///
/// The principal is reloaded on every request so role changes and
/// deletions take effect before the token expires.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Principal);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.jwt_service.validate(&token)?;

        let principal = state
            .principal_loader
            .load_user_by_username(&claims.username)
            .await
            .map_err(|e| match e {
                DomainError::AuthenticationFailed { .. } => {
                    ApiError::unauthorized("User no longer exists")
                }
                other => other.into(),
            })?;

        if principal.user_id().to_string() != claims.sub {
            debug!(username = %claims.username, "Token subject does not match current user");
            return Err(ApiError::unauthorized("User no longer exists"));
        }

        Ok(RequireUser(principal))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide JWT token via 'Authorization: Bearer <token>' header",
    ))
}
