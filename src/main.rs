use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use shelfwise::api::{create_router, AppState};
use shelfwise::cli::{self, Cli, Command};
use shelfwise::config::Config;
use shelfwise::db::{CatalogStore, ProfileStore};
use shelfwise::models::UserId;
use shelfwise::services::PersonalizationEngine;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shelfwise=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (status, message) = cli::failure_report(&e);
            eprintln!("{}", message);
            ExitCode::from(status)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    let user_id: UserId = config.default_user.parse()?;
    let engine = PersonalizationEngine::new(
        Arc::new(ProfileStore::new(&config.data_dir)),
        CatalogStore::new(config.catalog_path()),
    );

    tracing::debug!(data_dir = %config.data_dir.display(), user_id = %user_id, "Engine ready");

    match cli.command.unwrap_or_default() {
        Command::Serve => serve(&config, engine).await,
        command => {
            let mut stdout = io::stdout().lock();
            cli::execute(&engine, &user_id, command, &mut stdout)?;
            Ok(())
        }
    }
}

async fn serve(config: &Config, engine: PersonalizationEngine) -> anyhow::Result<()> {
    let app = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;
    Ok(())
}
