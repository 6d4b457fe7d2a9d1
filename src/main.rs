use clap::Parser;
use defpub_service::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::CreateAdmin(args) => cli::create_admin::run(args).await,
    }
}
