use std::path::PathBuf;
use std::sync::Arc;

use liteserve::config::ServerConfig;
use liteserve::observe::{LogObserver, RequestObserver};
use liteserve::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let (config, warnings) = ServerConfig::load(config_path.as_deref())?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let config = Arc::new(config);
    let observer: Arc<dyn RequestObserver> = Arc::new(LogObserver);

    tokio::select! {
        res = server::listener::run(config, Some(observer)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
