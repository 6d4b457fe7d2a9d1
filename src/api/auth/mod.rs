//! Authentication API endpoints
//!
//! Stateless JWT login and the current-principal lookup.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{LoginUser, Principal, Role};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: PrincipalResponse,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub authorities: Vec<&'static str>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.user_id().to_string(),
            username: principal.username().to_string(),
            role: principal.role(),
            authorities: principal.authorities(),
        }
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginUser>,
) -> Result<Json<LoginResponse>, ApiError> {
    let principal = state
        .authenticator
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    let token = state.jwt_service.generate(&principal)?;
    let claims = state.jwt_service.validate(&token)?;

    Ok(Json(LoginResponse {
        token,
        expires_at: claims.expires_at().to_rfc3339(),
        user: PrincipalResponse::from(&principal),
    }))
}

/// GET /auth/me
pub async fn get_current_user(RequireUser(principal): RequireUser) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&principal))
}
