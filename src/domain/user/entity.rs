//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, FieldViolation};

/// User identifier, generated once when the user is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::str::FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid user ID", s)))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    /// Assigned to every self-registered account
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    /// Authority name as seen by authorization checks
    pub fn authority(&self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::User => "ROLE_USER",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            other => Err(DomainError::invalid_input(vec![FieldViolation::new(
                "role",
                format!("Unknown role '{}'", other),
            )])),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration / login input. Never persisted.
#[derive(Clone, Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

impl LoginUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginUser")
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Persisted user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    username: String,
    /// Argon2 PHC string - never exposed in serialization
    #[serde(skip_serializing)]
    encrypted_password: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly generated ID and the default role
    pub fn new(username: impl Into<String>, encrypted_password: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            username: username.into(),
            encrypted_password: encrypted_password.into(),
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored columns
    pub fn from_parts(
        id: UserId,
        username: String,
        encrypted_password: String,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            encrypted_password,
            role,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn encrypted_password(&self) -> &str {
        &self.encrypted_password
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_to_user_role() {
        let user = User::new("testUser", "hash");

        assert_eq!(user.username(), "testUser");
        assert_eq!(user.encrypted_password(), "hash");
        assert_eq!(user.role(), Role::User);
        assert!(!user.is_admin());
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("alice", "hash");
        let b = User::new("bob", "hash");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_user_id_round_trips_through_string() {
        let id = UserId::generate();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        let err = "testId".parse::<UserId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId { .. }));
    }

    #[test]
    fn test_set_role_touches_timestamp() {
        let mut user = User::new("admin", "hash");
        let before = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        user.set_role(Role::Admin);

        assert!(user.is_admin());
        assert!(user.updated_at() > before);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.authority(), "ROLE_USER");
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = User::new("admin", "$argon2id$secret-hash");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("encrypted_password"));
        assert!(json.contains("\"role\":\"USER\""));
    }

    #[test]
    fn test_login_user_debug_hides_password() {
        let login = LoginUser::new("testUser2", "test password");
        let debug = format!("{:?}", login);
        assert!(debug.contains("testUser2"));
        assert!(!debug.contains("test password"));
    }
}
