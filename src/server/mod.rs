//! HTTP prediction service.

mod readiness;
mod response;
mod routes;
mod state;

pub use readiness::ReadinessGate;
pub use response::ApiError;
pub use routes::router;
pub use state::{GeolocationService, PredictError, spawn_loader};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::inference::ModelLoader;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Serve HTTP until shutdown is requested or the model fails to load.
///
/// The listener is bound before the model starts loading, so `/health`
/// answers immediately and `/predict` returns 503 until the load completes.
/// A failed load ends the server with that error.
pub async fn serve(config: Config) -> Result<()> {
    let service = Arc::new(GeolocationService::new());
    let app = router(Arc::clone(&service), &config.server)?;

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| Error::Bind {
            address: address.clone(),
            source: e,
        })?;
    info!("Listening on http://{address}");

    let loading = spawn_loader(
        ModelLoader::from_config(&config),
        Arc::clone(&service),
        ModelLoader::load,
    );

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    tokio::select! {
        result = server.into_future() => result.map_err(|e| Error::Serve { source: e }),
        err = load_failure(loading) => Err(err),
    }
}

/// Resolve only if the loader fails; a successful load never resolves.
async fn load_failure(loading: JoinHandle<Result<()>>) -> Error {
    match loading.await {
        Ok(Ok(())) => std::future::pending().await,
        Ok(Err(e)) => e,
        Err(e) => Error::Internal {
            message: format!("model loader task failed: {e}"),
        },
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received, draining connections");
}
