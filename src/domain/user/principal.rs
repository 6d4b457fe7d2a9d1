//! Authentication view of a user

use async_trait::async_trait;
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

use super::entity::{Role, User, UserId};
use crate::domain::DomainError;

/// Read-only projection of a [`User`] handed to the security layer.
///
/// Carries the stored password hash so the authenticator can verify a
/// login attempt; the hash is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    user_id: UserId,
    username: String,
    #[serde(skip_serializing)]
    password_hash: String,
    role: Role,
}

impl Principal {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Granted authorities, e.g. `["ROLE_USER"]`
    pub fn authorities(&self) -> Vec<&'static str> {
        vec![self.role.authority()]
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: *user.id(),
            username: user.username().to_string(),
            password_hash: user.encrypted_password().to_string(),
            role: user.role(),
        }
    }
}

/// Lookup used by the security layer while verifying credentials
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PrincipalLoader: Send + Sync {
    /// Fails with `AuthenticationFailed` when the username is unknown
    async fn load_user_by_username(&self, username: &str) -> Result<Principal, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_copies_identity_and_role() {
        let mut user = User::new("testUser", "$argon2id$hash");
        user.set_role(Role::Admin);

        let principal = Principal::from(&user);

        assert_eq!(principal.user_id(), user.id());
        assert_eq!(principal.username(), "testUser");
        assert_eq!(principal.password_hash(), "$argon2id$hash");
        assert!(principal.has_role(Role::Admin));
        assert_eq!(principal.authorities(), vec!["ROLE_ADMIN"]);
    }

    #[test]
    fn test_principal_serialization_excludes_hash() {
        let user = User::new("testUser", "$argon2id$hash");
        let json = serde_json::to_string(&Principal::from(&user)).unwrap();

        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"testUser\""));
        assert!(json.contains("\"role\":\"USER\""));
    }
}
