use anyhow::Result;
use peer_feedback::{
    config::{Config, RuntimeConfig},
    http::start_http_server,
    server::FeedbackServer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Must precede Config::load, which logs warnings
    Config::load_env_file();
    tracing_subscriber::fmt()
        .with_env_filter(RuntimeConfig::load_from_env().log_level.as_str())
        .init();

    let config = Config::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        "Starting peer-feedback {} (db={}, bind={})",
        env!("CARGO_PKG_VERSION"),
        config.database.path,
        config.server.http_bind
    );

    let server = FeedbackServer::new(config)?;
    start_http_server(server).await?;

    Ok(())
}
