//! User repository port

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Username uniqueness is the store's job: `save` must fail with
/// `DomainError::Conflict` when the username is taken.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// All users, in store-defined order
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Insert a new user
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Overwrite an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning whether a row was removed
    async fn delete_by_id(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Number of stored users
    async fn count(&self) -> Result<usize, DomainError>;
}
