//! Create-admin command - registers an account and promotes it to ADMIN

use clap::Args;
use tracing::info;

use crate::config::StorageBackend;
use crate::domain::user::LoginUser;

#[derive(Args)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long, env = "DEFPUB_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: CreateAdminArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    if config.storage.backend != StorageBackend::Postgres {
        anyhow::bail!("create-admin needs a persistent store; set storage.backend = \"postgres\"");
    }

    let service = crate::create_postgres_account_service(&config).await?;
    let admin = service
        .create_admin(LoginUser::new(args.username, args.password))
        .await?;

    info!(user_id = %admin.id(), username = %admin.username(), "Admin user created");

    Ok(())
}
