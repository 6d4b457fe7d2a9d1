//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// username -> user ID
    username_index: HashMap<String, UserId>,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .username_index
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;

        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at());

        Ok(users)
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if tables.username_index.contains_key(user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        tables
            .username_index
            .insert(user.username().to_string(), *user.id());
        tables.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        let Some(old_username) = tables
            .users
            .get(user.id())
            .map(|u| u.username().to_string())
        else {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        };

        if old_username != user.username() {
            if tables.username_index.contains_key(user.username()) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    user.username()
                )));
            }
            tables.username_index.remove(&old_username);
            tables
                .username_index
                .insert(user.username().to_string(), *user.id());
        }

        tables.users.insert(*user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;

        match tables.users.remove(id) {
            Some(user) => {
                tables.username_index.remove(user.username());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.tables.read().await.users.len())
    }
}
