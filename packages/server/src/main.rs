use anyhow::Context;
use tracing::info;

use scoreboard_server::config::AppConfig;
use scoreboard_server::database::init_db;
use scoreboard_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = init_db(&config.database)
        .await
        .context("Failed to initialise database")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = scoreboard_server::build_router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
