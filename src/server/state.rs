//! Long-lived service state shared by all request handlers.

use crate::error::{Error, Result};
use crate::imaging::{ImageRejection, validate_and_decode};
use crate::inference::{InferenceEngine, ModelLoader, Prediction};
use crate::server::ReadinessGate;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Why a prediction request did not produce a location.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Model has not finished loading.
    #[error("model is not loaded yet")]
    NotReady,

    /// Upload failed validation or decoding.
    #[error(transparent)]
    Rejected(#[from] ImageRejection),

    /// Inference failed after validation succeeded.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Owns the model behind its readiness gate.
#[derive(Debug, Default)]
pub struct GeolocationService {
    gate: ReadinessGate,
    engine: OnceLock<InferenceEngine>,
}

impl GeolocationService {
    /// Create a service with no model loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service that is ready immediately.
    pub fn with_engine(engine: InferenceEngine) -> Self {
        let gate = ReadinessGate::new();
        gate.signal_ready();
        Self {
            gate,
            engine: OnceLock::from(engine),
        }
    }

    /// Whether the model is loaded and usable.
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Store the loaded engine, then open the gate.
    pub fn install(&self, engine: InferenceEngine) -> Result<()> {
        self.engine
            .set(engine)
            .map_err(|_| Error::ModelAlreadyLoaded)?;
        self.gate.signal_ready();
        Ok(())
    }

    /// Loaded engine, if the gate is open.
    pub fn engine(&self) -> Option<&InferenceEngine> {
        if self.gate.is_ready() {
            self.engine.get()
        } else {
            None
        }
    }

    /// Validate, decode and run one upload through the model.
    pub fn predict_upload(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> std::result::Result<Prediction, PredictError> {
        let engine = self.engine().ok_or(PredictError::NotReady)?;
        let image = validate_and_decode(bytes, content_type)?;
        debug!("Decoded {}x{} upload", image.width(), image.height());
        Ok(engine.predict(&image)?)
    }
}

/// Run `build` on the blocking pool and install its engine into `service`.
///
/// The returned handle resolves with the load outcome; the service becomes
/// ready only after a successful load. `server::serve` passes
/// [`ModelLoader::load`].
pub fn spawn_loader<F>(
    loader: ModelLoader,
    service: Arc<GeolocationService>,
    build: F,
) -> JoinHandle<Result<()>>
where
    F: FnOnce(ModelLoader) -> Result<InferenceEngine> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let path = loader.model_path().to_path_buf();
        match build(loader) {
            Ok(engine) => {
                service.install(engine)?;
                info!("Model ready, accepting predictions");
                Ok(())
            }
            Err(e) => {
                error!("Failed to load model from {}: {e}", path.display());
                Err(e)
            }
        }
    })
}
