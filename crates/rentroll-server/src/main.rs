//! rentroll entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rentroll_core::repository::SessionRepository;
use rentroll_db::repository::SurrealSessionRepository;
use rentroll_db::{DbManager, run_migrations, seed_data};
use rentroll_server::{AppState, ServerConfig, app};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rentroll", version, about = "Property, tenant and lease management")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply pending schema migrations and exit.
    Migrate,
    /// Insert demo properties, tenants and leases.
    SeedData {
        /// Delete all leases, tenants and properties first.
        #[arg(long)]
        with_reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rentroll=info".parse()?))
        .json()
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db)
        .await
        .context("connecting to the database")?;
    let db = manager.client().clone();
    run_migrations(&db).await.context("running migrations")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => {
            info!("Migrations applied");
        }
        Command::SeedData { with_reset } => {
            let report = seed_data(&db, with_reset).await?;
            if report.skipped {
                info!("Seed skipped: properties already exist (pass --with-reset)");
            }
        }
        Command::Serve => {
            let removed = SurrealSessionRepository::new(db.clone())
                .cleanup_expired()
                .await?;
            info!(removed, "Expired sessions removed");

            let state = AppState::new(db, &config);
            let listener = TcpListener::bind(("0.0.0.0", config.port))
                .await
                .with_context(|| format!("binding port {}", config.port))?;
            info!(port = config.port, "Starting rentroll server");

            axum::serve(listener, app(state))
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
            info!("rentroll server stopped");
        }
    }
    Ok(())
}
