use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use xp_ladder::{load_data, load_tiers, router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let tiers = load_tiers(config.tiers_path.as_deref()).await?;
    let data = load_data(&config.data_path).await;
    info!(xp = data.xp, level = tiers.resolve_tier(data.xp).level, "state loaded");

    let app = router(AppState::new(config.data_path, tiers, data));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
