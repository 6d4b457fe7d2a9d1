//! CLI module for the defpub service
//!
//! - `serve`: run the HTTP API
//! - `create-admin`: create an ADMIN account in the configured store

pub mod create_admin;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Defpub - user accounts and credentials service
#[derive(Parser)]
#[command(name = "defpub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Create an admin account
    CreateAdmin(create_admin::CreateAdminArgs),
}

/// Load `.env`, configuration and logging shared by every subcommand
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
