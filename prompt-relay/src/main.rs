use prompt_relay::config::{RelayConfig, API_KEY_ENV};
use prompt_relay::observability::init_tracing;
use prompt_relay::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RelayConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "prompt-relay",
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    if config.api_key.is_none() {
        tracing::warn!("{} is not set; generate requests will fail", API_KEY_ENV);
    }

    let app = Application::build(config).await?;
    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
