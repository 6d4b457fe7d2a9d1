//! User account service: registration, lookup, deletion and principal loading

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::user::{
    validate_login_user, LoginUser, Principal, PrincipalLoader, Role, User, UserId,
    UserRepository,
};
use crate::domain::user_config::{ConfigDeletionPolicy, UserConfig, UserConfigRepository};
use crate::domain::DomainError;
use crate::infrastructure::observability;

use super::password::CredentialHasher;

/// Account lifecycle service
#[derive(Debug)]
pub struct UserAccountService<R: UserRepository, C: UserConfigRepository, H: CredentialHasher> {
    users: Arc<R>,
    configs: Arc<C>,
    hasher: Arc<H>,
    deletion_policy: ConfigDeletionPolicy,
}

impl<R: UserRepository, C: UserConfigRepository, H: CredentialHasher> UserAccountService<R, C, H> {
    pub fn new(users: Arc<R>, configs: Arc<C>, hasher: Arc<H>) -> Self {
        Self {
            users,
            configs,
            hasher,
            deletion_policy: ConfigDeletionPolicy::default(),
        }
    }

    pub fn with_deletion_policy(mut self, policy: ConfigDeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    /// Look up a user by its unique username
    pub async fn find_one(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", username)))
    }

    pub async fn find_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    pub async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        self.users.find_all().await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }

    /// Register a new account.
    ///
    /// The password is hashed before anything is persisted and the role is
    /// always [`Role::User`]. Username uniqueness is left to the repository,
    /// which reports duplicates as `Conflict`. The user and its config are
    /// two separate writes: when the config write fails the user remains.
    pub async fn save(&self, input: LoginUser) -> Result<User, DomainError> {
        validate_login_user(&input)
            .map_err(|errors| DomainError::invalid_input(errors.into_field_violations()))?;

        let encrypted_password = self.hasher.hash(&input.password)?;
        let user = self
            .users
            .save(User::new(input.username, encrypted_password))
            .await?;

        if let Err(e) = self.configs.save(UserConfig::for_user(*user.id())).await {
            warn!(
                user_id = %user.id(),
                error = %e,
                "User persisted but config creation failed"
            );
            return Err(e);
        }

        observability::record_account_registered();
        info!(user_id = %user.id(), username = %user.username(), "User registered");

        Ok(user)
    }

    /// Delete a user by ID, then apply the config deletion policy
    pub async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        if !self.users.delete_by_id(id).await? {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        if self.deletion_policy == ConfigDeletionPolicy::Cascade {
            let removed = self.configs.delete_by_user_id(id).await?;
            debug!(user_id = %id, removed, "Cascaded config deletion");
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn update_role(&self, id: &UserId, role: Role) -> Result<User, DomainError> {
        let mut user = self.find_by_id(id).await?;

        if user.role() == role {
            return Ok(user);
        }

        user.set_role(role);
        let user = self.users.update(&user).await?;

        info!(user_id = %id, role = %role, "User role changed");
        Ok(user)
    }

    /// A config whose user no longer exists is reported as not found
    pub async fn find_config(&self, user_id: &UserId) -> Result<UserConfig, DomainError> {
        self.find_by_id(user_id).await?;

        self.configs
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Config for user '{}' not found", user_id))
            })
    }

    /// Merge `settings` into the user's config; keys not present are kept
    pub async fn update_config(
        &self,
        user_id: &UserId,
        settings: BTreeMap<String, String>,
    ) -> Result<UserConfig, DomainError> {
        let mut config = self.find_config(user_id).await?;
        config.merge(settings);
        self.configs.save(config).await
    }

    /// Create an admin through the normal registration path
    pub async fn create_admin(&self, input: LoginUser) -> Result<User, DomainError> {
        let user = self.save(input).await?;
        self.update_role(user.id(), Role::Admin).await
    }

    /// Create the first admin account when the store is empty.
    ///
    /// Returns `None` when users already exist.
    pub async fn bootstrap_admin(&self, input: LoginUser) -> Result<Option<User>, DomainError> {
        if self.users.count().await? > 0 {
            debug!("Users already exist, skipping admin bootstrap");
            return Ok(None);
        }

        let admin = self.create_admin(input).await?;
        info!(username = %admin.username(), "Bootstrapped admin user");

        Ok(Some(admin))
    }
}

#[async_trait]
impl<R, C, H> PrincipalLoader for UserAccountService<R, C, H>
where
    R: UserRepository + 'static,
    C: UserConfigRepository + 'static,
    H: CredentialHasher + 'static,
{
    async fn load_user_by_username(&self, username: &str) -> Result<Principal, DomainError> {
        match self.users.find_by_username(username).await? {
            Some(user) => Ok(Principal::from(&user)),
            None => Err(DomainError::authentication_failed(format!(
                "User '{}' not found",
                username
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::domain::user_config::MockUserConfigRepository;
    use crate::infrastructure::user::MockCredentialHasher;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};
    use crate::infrastructure::user_config::InMemoryUserConfigRepository;

    type MemoryService =
        UserAccountService<InMemoryUserRepository, InMemoryUserConfigRepository, Argon2Hasher>;

    fn memory_service() -> (MemoryService, Arc<InMemoryUserConfigRepository>) {
        let configs = Arc::new(InMemoryUserConfigRepository::new());
        let service = UserAccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            configs.clone(),
            Arc::new(Argon2Hasher::new()),
        );
        (service, configs)
    }

    fn fake_hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|p| Ok(format!("hashed:{}", p)));
        hasher
    }

    #[tokio::test]
    async fn test_save_hashes_password_and_defaults_role() {
        let (service, _) = memory_service();

        let user = service
            .save(LoginUser::new("testUser2", "test password"))
            .await
            .unwrap();

        assert_eq!(user.username(), "testUser2");
        assert_eq!(user.role(), Role::User);
        assert_ne!(user.encrypted_password(), "test password");
        assert!(Argon2Hasher::new().verify("test password", user.encrypted_password()));
    }

    #[tokio::test]
    async fn test_save_persists_exactly_one_config() {
        let mut users = MockUserRepository::new();
        users.expect_save().times(1).returning(Ok);

        let mut configs = MockUserConfigRepository::new();
        configs.expect_save().times(1).returning(Ok);

        let service =
            UserAccountService::new(Arc::new(users), Arc::new(configs), Arc::new(fake_hasher()));

        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();

        assert_eq!(user.encrypted_password(), "hashed:password123");
    }

    #[tokio::test]
    async fn test_save_config_references_new_user() {
        let (service, configs) = memory_service();

        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();

        let config = configs.find_by_user_id(user.id()).await.unwrap().unwrap();
        assert!(config.settings().is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_input_before_any_write() {
        let mut users = MockUserRepository::new();
        users.expect_save().never();
        let mut configs = MockUserConfigRepository::new();
        configs.expect_save().never();
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().never();

        let service = UserAccountService::new(Arc::new(users), Arc::new(configs), Arc::new(hasher));

        let err = service.save(LoginUser::new("x", "short")).await.unwrap_err();

        match err {
            DomainError::InvalidInput { violations } => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert!(fields.contains(&"username"));
                assert!(fields.contains(&"password"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_duplicate_username_conflicts() {
        let (service, _) = memory_service();

        service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();
        let result = service.save(LoginUser::new("testUser", "password456")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_save_keeps_user_when_config_write_fails() {
        let users = Arc::new(InMemoryUserRepository::new());
        let mut configs = MockUserConfigRepository::new();
        configs
            .expect_save()
            .times(1)
            .returning(|_| Err(DomainError::storage("config store down")));

        let service = UserAccountService::new(users.clone(), Arc::new(configs), Arc::new(fake_hasher()));

        let result = service.save(LoginUser::new("testUser", "password123")).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(users.find_by_username("testUser").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_one_after_save() {
        let (service, _) = memory_service();
        service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();

        let user = service.find_one("testUser").await.unwrap();
        assert_eq!(user.username(), "testUser");
    }

    #[tokio::test]
    async fn test_find_one_missing_is_not_found() {
        let (service, _) = memory_service();
        let result = service.find_one("nobody").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = UserAccountService::new(
            Arc::new(users),
            Arc::new(MockUserConfigRepository::new()),
            Arc::new(MockCredentialHasher::new()),
        );

        let result = service.find_by_id(&UserId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_all() {
        let (service, _) = memory_service();
        service
            .save(LoginUser::new("alice", "password123"))
            .await
            .unwrap();
        service
            .save(LoginUser::new("bob_1", "password123"))
            .await
            .unwrap();

        assert_eq!(service.find_all().await.unwrap().len(), 2);
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_calls_delete_by_id_once() {
        let id = UserId::generate();

        let mut users = MockUserRepository::new();
        users
            .expect_delete_by_id()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(|_| Ok(true));
        // any other call on the mock would panic

        let mut configs = MockUserConfigRepository::new();
        configs
            .expect_delete_by_user_id()
            .times(1)
            .returning(|_| Ok(true));

        let service = UserAccountService::new(
            Arc::new(users),
            Arc::new(configs),
            Arc::new(MockCredentialHasher::new()),
        );

        service.delete(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_unknown_id_skips_config() {
        let mut users = MockUserRepository::new();
        users
            .expect_delete_by_id()
            .times(1)
            .returning(|_| Ok(false));
        let mut configs = MockUserConfigRepository::new();
        configs.expect_delete_by_user_id().never();

        let service = UserAccountService::new(
            Arc::new(users),
            Arc::new(configs),
            Arc::new(MockCredentialHasher::new()),
        );

        let result = service.delete(&UserId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_with_retain_policy_keeps_config() {
        let configs = Arc::new(InMemoryUserConfigRepository::new());
        let service = UserAccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            configs.clone(),
            Arc::new(Argon2Hasher::new()),
        )
        .with_deletion_policy(ConfigDeletionPolicy::Retain);

        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();
        service.delete(user.id()).await.unwrap();

        assert!(service.find_by_id(user.id()).await.unwrap_err().is_not_found());
        assert!(configs.find_by_user_id(user.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_retained_config_of_deleted_user_is_not_served() {
        let configs = Arc::new(InMemoryUserConfigRepository::new());
        let service = UserAccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            configs.clone(),
            Arc::new(Argon2Hasher::new()),
        )
        .with_deletion_policy(ConfigDeletionPolicy::Retain);

        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();
        service.delete(user.id()).await.unwrap();

        let found = service.find_config(user.id()).await;
        assert!(matches!(found, Err(DomainError::NotFound { .. })));

        let updated = service
            .update_config(
                user.id(),
                BTreeMap::from([("k".to_string(), "v".to_string())]),
            )
            .await;
        assert!(matches!(updated, Err(DomainError::NotFound { .. })));

        let stored = configs.find_by_user_id(user.id()).await.unwrap().unwrap();
        assert!(stored.settings().is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_cascade_policy_removes_config() {
        let (service, configs) = memory_service();

        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();
        service.delete(user.id()).await.unwrap();

        assert!(configs.find_by_user_id(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_user_by_username() {
        let (service, _) = memory_service();
        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();

        let principal = service.load_user_by_username("testUser").await.unwrap();

        assert_eq!(principal.user_id(), user.id());
        assert_eq!(principal.role(), Role::User);
        assert_eq!(principal.authorities(), vec!["ROLE_USER"]);
    }

    #[tokio::test]
    async fn test_load_unknown_user_fails_authentication() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserAccountService::new(
            Arc::new(users),
            Arc::new(MockUserConfigRepository::new()),
            Arc::new(MockCredentialHasher::new()),
        );

        let result = service.load_user_by_username("ghost").await;
        assert!(matches!(
            result,
            Err(DomainError::AuthenticationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_role() {
        let (service, _) = memory_service();
        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();

        let promoted = service.update_role(user.id(), Role::Admin).await.unwrap();
        assert!(promoted.is_admin());

        let stored = service.find_one("testUser").await.unwrap();
        assert_eq!(stored.role(), Role::Admin);
    }

    #[tokio::test]
    async fn test_update_config_merges_settings() {
        let (service, _) = memory_service();
        let user = service
            .save(LoginUser::new("testUser", "password123"))
            .await
            .unwrap();

        let mut first = BTreeMap::new();
        first.insert("theme".to_string(), "dark".to_string());
        first.insert("lang".to_string(), "en".to_string());
        service.update_config(user.id(), first).await.unwrap();

        let mut second = BTreeMap::new();
        second.insert("lang".to_string(), "de".to_string());
        let config = service.update_config(user.id(), second).await.unwrap();

        assert_eq!(config.get("theme"), Some("dark"));
        assert_eq!(config.get("lang"), Some("de"));
        assert_eq!(service.find_config(user.id()).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_find_config_missing_user() {
        let (service, _) = memory_service();
        let result = service.find_config(&UserId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_on_empty_store() {
        let (service, _) = memory_service();

        let admin = service
            .bootstrap_admin(LoginUser::new("admin", "admin-password"))
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin());

        let second = service
            .bootstrap_admin(LoginUser::new("admin2", "admin-password"))
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(service.count().await.unwrap(), 1);
    }
}
