//! Per-user configuration domain

mod entity;
mod policy;
mod repository;

pub use entity::UserConfig;
pub use policy::ConfigDeletionPolicy;
pub use repository::UserConfigRepository;

#[cfg(test)]
pub use repository::MockUserConfigRepository;
