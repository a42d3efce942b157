use dotenvy::dotenv;
use media_studio::config::Settings;
use media_studio::observability::init_tracing;
use media_studio::services::metrics;
use media_studio::startup::Application;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("info");

    metrics::init_metrics();

    let app = Application::build(settings)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?;

    info!("Starting media-studio on port {}", app.port());

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
