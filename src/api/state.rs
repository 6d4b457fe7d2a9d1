//! Application state for shared services

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::user::{LoginUser, PrincipalLoader, Role, User, UserId, UserRepository};
use crate::domain::user_config::{UserConfig, UserConfigRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{Authenticator, JwtGenerator};
use crate::infrastructure::user::{CredentialHasher, UserAccountService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub principal_loader: Arc<dyn PrincipalLoader>,
    pub authenticator: Authenticator,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    /// Wire the handlers to one account service; the service also acts as
    /// the principal loader behind authentication
    pub fn new<R, C, H>(
        service: Arc<UserAccountService<R, C, H>>,
        hasher: Arc<H>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self
    where
        R: UserRepository + 'static,
        C: UserConfigRepository + 'static,
        H: CredentialHasher + 'static,
    {
        let authenticator = Authenticator::new(service.clone(), hasher);

        Self {
            user_service: service.clone(),
            principal_loader: service,
            authenticator,
            jwt_service,
        }
    }
}

/// Account operations exposed to the HTTP layer
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn find_one(&self, username: &str) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError>;
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn save(&self, input: LoginUser) -> Result<User, DomainError>;
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;
    async fn update_role(&self, id: &UserId, role: Role) -> Result<User, DomainError>;
    async fn find_config(&self, user_id: &UserId) -> Result<UserConfig, DomainError>;
    async fn update_config(
        &self,
        user_id: &UserId,
        settings: BTreeMap<String, String>,
    ) -> Result<UserConfig, DomainError>;
}

#[async_trait::async_trait]
impl<R, C, H> UserServiceTrait for UserAccountService<R, C, H>
where
    R: UserRepository + 'static,
    C: UserConfigRepository + 'static,
    H: CredentialHasher + 'static,
{
    async fn find_one(&self, username: &str) -> Result<User, DomainError> {
        UserAccountService::find_one(self, username).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        UserAccountService::find_by_id(self, id).await
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        UserAccountService::find_all(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserAccountService::count(self).await
    }

    async fn save(&self, input: LoginUser) -> Result<User, DomainError> {
        UserAccountService::save(self, input).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        UserAccountService::delete(self, id).await
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<User, DomainError> {
        UserAccountService::update_role(self, id, role).await
    }

    async fn find_config(&self, user_id: &UserId) -> Result<UserConfig, DomainError> {
        UserAccountService::find_config(self, user_id).await
    }

    async fn update_config(
        &self,
        user_id: &UserId,
        settings: BTreeMap<String, String>,
    ) -> Result<UserConfig, DomainError> {
        UserAccountService::update_config(self, user_id, settings).await
    }
}
