//! Application configuration

mod app_config;

pub use app_config::{
    AccountsConfig, AppConfig, AuthConfig, BootstrapAdminConfig, LogFormat, LoggingConfig,
    MetricsConfig, ServerConfig, StorageBackend, StorageConfig, DEFAULT_JWT_SECRET,
};
