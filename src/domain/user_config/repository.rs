//! User config repository port

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::UserConfig;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for per-user configuration records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserConfigRepository: Send + Sync {
    /// Insert or replace the config of `config.user_id()`
    async fn save(&self, config: UserConfig) -> Result<UserConfig, DomainError>;

    /// Config owned by the given user
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserConfig>, DomainError>;

    /// Remove the config owned by the given user, returning whether one existed
    async fn delete_by_user_id(&self, user_id: &UserId) -> Result<bool, DomainError>;
}
