//! User infrastructure module
//!
//! Argon2 credential hashing, the in-memory and PostgreSQL user repositories,
//! and the account service that ties them to the config store.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, CredentialHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::UserAccountService;

#[cfg(test)]
pub use password::MockCredentialHasher;
