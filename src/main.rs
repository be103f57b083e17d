//! Mami Cafe accounts backend - entry point
//!
//! Loads configuration, opens the SQLite database, makes sure the schema exists and serves
//! the account API.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cafe_accounts::config::Config;
use cafe_accounts::db::{Database, init_schema};
use cafe_accounts::{AppState, api};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cafe_accounts=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Mami Cafe accounts backend");

    let config = Config::from_env()?;
    tracing::info!(database = %config.database_path, port = config.port, "Configuration loaded");

    // Any failure from here on aborts startup before the listener is bound
    let db = match Database::connect(&config.database_path).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Error connecting to database");
            return Err(e);
        }
    };
    tracing::info!("Database connected");

    if let Err(e) = init_schema(db.pool()).await {
        tracing::error!(error = %e, "Schema initialization failed");
        return Err(e);
    }

    let app = api::router(AppState::new(db));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
