//! Admin-only extractor

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::{Principal, Role};

use super::user_auth::RequireUser;

/// Authenticated principal holding the ADMIN role; other users get 403
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(principal) = RequireUser::from_request_parts(parts, state).await?;

        if !principal.has_role(Role::Admin) {
            debug!(user_id = %principal.user_id(), "Admin access denied");
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(RequireAdmin(principal))
    }
}
