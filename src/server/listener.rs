use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::parser::ParseError;
use crate::storage::FileStore;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    let store = Arc::new(FileStore::new(cfg.directory.clone()));
    if !store.root().is_dir() {
        warn!("Serving directory {} does not exist", store.root().display());
    }
    info!("Serving files from {}", store.root().display());

    serve(listener, store).await
}

/// Accept loop. Each connection gets its own task; nothing but the store
/// is shared between them. Slow peers are not timed out.
pub async fn serve(listener: TcpListener, store: Arc<FileStore>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let store = store.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, store);
            if let Err(e) = conn.run().await {
                match e.downcast_ref::<ParseError>() {
                    Some(parse_error) => {
                        warn!("Dropping connection from {}: {}", peer, parse_error)
                    }
                    None => error!("Connection error from {}: {}", peer, e),
                }
            }
        });
    }
}
