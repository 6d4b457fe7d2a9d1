//! Defpub service
//!
//! User account lifecycle and credential service:
//! - Registration with Argon2 password hashing and default USER role
//! - Per-user config records created alongside each account
//! - JWT login backed by a principal loader
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use api::state::AppState;
use config::{StorageBackend, StorageConfig, DEFAULT_JWT_SECRET};
use domain::user::{LoginUser, User, UserRepository};
use domain::user_config::UserConfigRepository;
use infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserAccountService,
};
use infrastructure::user_config::{InMemoryUserConfigRepository, PostgresUserConfigRepository};

pub type MemoryAccountService =
    UserAccountService<InMemoryUserRepository, InMemoryUserConfigRepository, Argon2Hasher>;

pub type PostgresAccountService =
    UserAccountService<PostgresUserRepository, PostgresUserConfigRepository, Argon2Hasher>;

/// Create the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::new());
    let jwt_service = build_jwt_service(config);

    info!("Storage backend: {:?}", config.storage.backend);

    match config.storage.backend {
        StorageBackend::Memory => {
            let service = Arc::new(
                UserAccountService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryUserConfigRepository::new()),
                    hasher.clone(),
                )
                .with_deletion_policy(config.accounts.config_deletion),
            );
            finish_state(service, hasher, jwt_service, config).await
        }
        StorageBackend::Postgres => {
            let service = Arc::new(create_postgres_account_service(config).await?);
            finish_state(service, hasher, jwt_service, config).await
        }
    }
}

/// Account service over PostgreSQL, with migrations applied
pub async fn create_postgres_account_service(
    config: &AppConfig,
) -> anyhow::Result<PostgresAccountService> {
    let pool = connect_postgres(&config.storage).await?;

    Ok(UserAccountService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresUserConfigRepository::new(pool)),
        Arc::new(Argon2Hasher::new()),
    )
    .with_deletion_policy(config.accounts.config_deletion))
}

async fn connect_postgres(storage: &StorageConfig) -> anyhow::Result<PgPool> {
    let database_url = storage
        .database_url
        .as_deref()
        .context("storage.database_url or DATABASE_URL is required for the postgres backend")?;

    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(storage.max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("PostgreSQL connection established");

    Ok(pool)
}

fn build_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set auth.jwt_secret or JWT_SECRET in production");
    }

    Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    )))
}

async fn finish_state<R, C>(
    service: Arc<UserAccountService<R, C, Argon2Hasher>>,
    hasher: Arc<Argon2Hasher>,
    jwt_service: Arc<dyn JwtGenerator>,
    config: &AppConfig,
) -> anyhow::Result<AppState>
where
    R: UserRepository + 'static,
    C: UserConfigRepository + 'static,
{
    if let Some(admin) = &config.accounts.bootstrap_admin {
        let created: Option<User> = service
            .bootstrap_admin(LoginUser::new(&admin.username, &admin.password))
            .await
            .context("Failed to bootstrap admin user")?;

        if let Some(user) = created {
            info!(username = %user.username(), "Initial admin user created");
        }
    }

    Ok(AppState::new(service, hasher, jwt_service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapAdminConfig;

    #[tokio::test]
    async fn test_memory_state_bootstraps_admin() {
        let mut config = AppConfig::default();
        config.accounts.bootstrap_admin = Some(BootstrapAdminConfig {
            username: "admin".to_string(),
            password: "admin-password".to_string(),
        });

        let state = create_app_state_with_config(&config).await.unwrap();

        let admin = state.user_service.find_one("admin").await.unwrap();
        assert!(admin.is_admin());
        assert_eq!(state.user_service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_database_url() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        config.storage.database_url = None;

        let err = create_app_state_with_config(&config).await.err().unwrap();
        assert!(err.to_string().contains("database_url"));
    }
}
