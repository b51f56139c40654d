//! Startup orchestration.
//!
//! Order: configuration is already loaded and logging installed by the
//! binary; here the static directory is resolved, the engine and server
//! context are built, and the listener is bound last so traffic only
//! arrives once everything is ready.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ApiConfig;
use crate::context::ServerContext;
use crate::engine::CommandEngine;
use crate::http::{ensure_static_dir, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::LogHandle;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("static directory: {0}")]
    StaticDir(#[source] std::io::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the server context backed by the harvester CLI.
pub fn build_context(mut config: ApiConfig, log: LogHandle) -> Result<Arc<ServerContext>, StartupError> {
    let static_dir = ensure_static_dir(Path::new(&config.static_files.directory))
        .map_err(StartupError::StaticDir)?;
    config.static_files.directory = static_dir.to_string_lossy().into_owned();

    let engine = CommandEngine::from_config(&config.engine, &static_dir);

    tracing::info!(
        binary = %config.engine.binary,
        sources = config.engine.sources.len(),
        static_dir = %static_dir.display(),
        timeout_secs = config.engine.timeout_secs,
        "Harvest engine configured"
    );

    Ok(Arc::new(ServerContext::new(config, Arc::new(engine)).with_log_handle(log)))
}

/// Bind, serve until `shutdown` fires, then release the context.
pub async fn serve(context: Arc<ServerContext>, shutdown: &Shutdown) -> Result<(), StartupError> {
    let address = context.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listening for connections");
    }

    let server = HttpServer::new(context.clone());
    let result = server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve);

    context.shutdown();
    result
}
