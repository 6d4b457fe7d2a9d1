//! User config infrastructure: in-memory and PostgreSQL stores

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresUserConfigRepository;
pub use repository::InMemoryUserConfigRepository;
