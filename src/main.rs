use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use songs_service::config::Settings;
use songs_service::db::Database;
use songs_service::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .init();

    let settings = Settings::from_env().context("invalid service configuration")?;

    let database = Database::connect(&settings)
        .await
        .context("failed to connect to database")?;
    info!("📊 Connected to PostgreSQL database");

    database
        .ensure_schema()
        .await
        .context("failed to create songs table")?;
    info!("📊 Songs table ready");

    let addr = settings.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let app = songs_service::app(AppState::new(database));

    info!("🎵 Songs service listening on {}", addr);
    info!("📡 Song endpoints: /songs, /songs/{{id}}, /songs/{{id}}/play");

    axum::serve(listener, app).await?;
    Ok(())
}
