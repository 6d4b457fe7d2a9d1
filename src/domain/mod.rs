//! Domain layer - Core business logic and entities

pub mod error;
pub mod user;
pub mod user_config;

pub use error::{DomainError, FieldViolation};
pub use user::{LoginUser, Principal, PrincipalLoader, Role, User, UserId, UserRepository};
pub use user_config::{ConfigDeletionPolicy, UserConfig, UserConfigRepository};
