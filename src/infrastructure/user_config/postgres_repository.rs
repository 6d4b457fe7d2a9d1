//! PostgreSQL user config repository implementation

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::UserId;
use crate::domain::user_config::{UserConfig, UserConfigRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserConfigRepository
#[derive(Debug, Clone)]
pub struct PostgresUserConfigRepository {
    pool: PgPool,
}

impl PostgresUserConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserConfigRepository for PostgresUserConfigRepository {
    async fn save(&self, config: UserConfig) -> Result<UserConfig, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_configs (user_id, settings, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET settings = EXCLUDED.settings, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(config.user_id().as_uuid())
        .bind(Json(config.settings()))
        .bind(config.created_at())
        .bind(config.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save user config: {}", e)))?;

        Ok(config)
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserConfig>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, settings, created_at, updated_at
            FROM user_configs
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user config: {}", e)))?;

        Ok(row.as_ref().map(row_to_config))
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_configs WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user config: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_config(row: &sqlx::postgres::PgRow) -> UserConfig {
    let user_id: Uuid = row.get("user_id");
    let Json(settings): Json<BTreeMap<String, String>> = row.get("settings");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    UserConfig::from_parts(UserId::from_uuid(user_id), settings, created_at, updated_at)
}
