//! In-memory user config repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::UserId;
use crate::domain::user_config::{UserConfig, UserConfigRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserConfigRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserConfigRepository {
    configs: Arc<RwLock<HashMap<UserId, UserConfig>>>,
}

impl InMemoryUserConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserConfigRepository for InMemoryUserConfigRepository {
    async fn save(&self, config: UserConfig) -> Result<UserConfig, DomainError> {
        let mut configs = self.configs.write().await;
        configs.insert(*config.user_id(), config.clone());
        Ok(config)
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserConfig>, DomainError> {
        Ok(self.configs.read().await.get(user_id).cloned())
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self.configs.write().await.remove(user_id).is_some())
    }
}
