//! One-shot model construction.

use crate::config::{Config, ModelConfig, TransformConfig};
use crate::error::{Error, Result};
use crate::imaging::ImageTransform;
use crate::inference::{InferenceEngine, OnnxRegressor, Regressor};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Builds the inference engine from its artifact.
///
/// `load` consumes the loader, so each loader constructs at most one model.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    model: ModelConfig,
    transform: TransformConfig,
}

impl ModelLoader {
    /// Create a loader for the given model and preprocessing settings.
    pub const fn new(model: ModelConfig, transform: TransformConfig) -> Self {
        Self { model, transform }
    }

    /// Create a loader from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.model.clone(), config.transform.clone())
    }

    /// Path of the model artifact.
    pub fn model_path(&self) -> &Path {
        &self.model.path
    }

    /// Load the ONNX model and verify it with a warm-up pass.
    pub fn load(self) -> Result<InferenceEngine> {
        self.load_with(|config| {
            OnnxRegressor::from_config(config).map(|r| Box::new(r) as Box<dyn Regressor>)
        })
    }

    /// Load using a custom backend constructor.
    ///
    /// The artifact must exist; the constructed engine must pass a warm-up
    /// prediction before it is returned.
    pub fn load_with<F>(self, build: F) -> Result<InferenceEngine>
    where
        F: FnOnce(&ModelConfig) -> Result<Box<dyn Regressor>>,
    {
        let path = self.model.path.clone();
        if !path.is_file() {
            return Err(Error::ModelFileNotFound { path });
        }

        info!("Loading model from {}", path.display());
        let started = Instant::now();

        let model = build(&self.model)?;
        let engine = InferenceEngine::new(model, ImageTransform::from_config(&self.transform));

        let probe = engine.warm_up().map_err(|e| Error::ModelLoad {
            path: path.clone(),
            reason: format!("warm-up prediction failed: {e}"),
        })?;

        info!(
            "Model loaded in {:.2}s (warm-up prediction: {:.4}, {:.4})",
            started.elapsed().as_secs_f64(),
            probe.longitude,
            probe.latitude
        );

        Ok(engine)
    }
}
