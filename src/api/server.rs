//! API server lifecycle: bind, spawn the axum server in a background task,
//! return a handle with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

/// Errors starting the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to read bound address: {0}")]
    LocalAddr(std::io::Error),
}

/// Metadata for a running server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub addr: SocketAddr,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub info: ServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ApiServer {
    pub fn addr(&self) -> SocketAddr {
        self.info.addr
    }

    /// Signal a graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "API server task failed");
            }
        }
    }
}

/// Bind `addr` and serve the API until `shutdown` is called.
///
/// Port 0 picks an ephemeral port; the bound address is in the returned
/// handle.
pub async fn start_api_server(core: Arc<CoreState>, addr: SocketAddr) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = api_router(core);
    let info = ServerInfo {
        addr,
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!(error = %e, "API server error");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        info,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
