use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::observe::RequestObserver;

/// Binds the configured address and serves connections until the task is
/// dropped. Each accepted socket gets its own spawned connection task; one
/// failing connection never affects the others.
pub async fn run(
    config: Arc<ServerConfig>,
    observer: Option<Arc<dyn RequestObserver>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on {}", config.listen_addr);
    info!("Publishing {:?}", config.root_dir);

    loop {
        let (socket, peer) = listener.accept().await?;

        let config = config.clone();
        let observer = observer.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, config);
            if let Some(observer) = observer {
                conn = conn.with_observer(observer);
            }
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
