//! User account endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::{RequireAdmin, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{LoginUser, Principal, Role, User, UserId};
use crate::domain::user_config::UserConfig;

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/signup", post(signup))
        .route("/by-username/{username}", get(get_user_by_username))
        .route("/{id}", get(get_user).delete(delete_user))
        .route("/{id}/role", put(update_role))
        .route("/{id}/config", get(get_config).put(update_config))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    pub settings: BTreeMap<String, String>,
}

/// POST /users/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<LoginUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.user_service.save(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.user_service.find_all().await?))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _user: RequireUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = id.parse()?;
    Ok(Json(state.user_service.find_by_id(&id).await?))
}

/// GET /users/by-username/{username}
pub async fn get_user_by_username(
    State(state): State<AppState>,
    _user: RequireUser,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.find_one(&username).await?))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: UserId = id.parse()?;

    if admin.user_id() == &id {
        return Err(
            ApiError::bad_request("Administrators cannot delete their own account")
                .with_param("id"),
        );
    }

    state.user_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/{id}/role
pub async fn update_role(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = id.parse()?;
    Ok(Json(state.user_service.update_role(&id, request.role).await?))
}

/// GET /users/{id}/config
pub async fn get_config(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<UserConfig>, ApiError> {
    let id = owned_user_id(&principal, &id)?;
    Ok(Json(state.user_service.find_config(&id).await?))
}

/// PUT /users/{id}/config
pub async fn update_config(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<Json<UserConfig>, ApiError> {
    let id = owned_user_id(&principal, &id)?;
    Ok(Json(
        state.user_service.update_config(&id, request.settings).await?,
    ))
}

/// Parse `raw` and check the caller owns that account or is an admin
fn owned_user_id(principal: &Principal, raw: &str) -> Result<UserId, ApiError> {
    let id: UserId = raw.parse()?;

    if principal.user_id() != &id && !principal.has_role(Role::Admin) {
        return Err(ApiError::forbidden("Access to another user's config is not allowed"));
    }

    Ok(id)
}
