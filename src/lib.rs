pub mod api;
pub mod config;
pub mod core_state;
pub mod education;
pub mod intake;
pub mod llm;
pub mod models;
pub mod store;
pub mod triage;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};

/// Errors that stop the service from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to initialise state: {0}")]
    Core(#[from] CoreError),
    #[error("Failed to build async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Start the service and serve the API until Ctrl-C.
pub fn run() -> Result<(), RunError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::SYSTEM_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr;
    tracing::info!(
        data_file = %config.data_file.display(),
        external_model = config.use_external_model(),
        "Configuration resolved"
    );

    // The blocking HTTP client inside the engine must be built and dropped
    // outside the async runtime.
    let core = Arc::new(CoreState::from_config(config)?);

    let runtime = tokio::runtime::Runtime::new().map_err(RunError::Runtime)?;
    let result = runtime.block_on(serve(core.clone(), bind_addr));
    drop(runtime);
    drop(core);
    result
}

async fn serve(core: Arc<CoreState>, addr: std::net::SocketAddr) -> Result<(), RunError> {
    let server = api::start_api_server(core, addr).await?;
    tracing::info!(addr = %server.addr(), "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    server.stop().await;
    Ok(())
}
