//! Regression backends.

use crate::config::{InferenceDevice, ModelConfig};
use crate::error::{Error, Result};
use crate::imaging::ImageTensor;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// A loaded model mapping one input tensor to a flat output vector.
///
/// Implementations must be deterministic: identical inputs give identical
/// outputs, with no training-mode behavior such as dropout.
pub trait Regressor: Send + Sync {
    /// Run a single forward pass.
    fn forward(&self, input: ImageTensor) -> Result<Vec<f32>>;
}

/// ONNX Runtime backed regressor.
pub struct OnnxRegressor {
    // ort needs exclusive access to a session while it runs.
    session: Mutex<Session>,
}

impl OnnxRegressor {
    /// Build a session from model configuration.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Self::from_file(&config.path, config.device, config.intra_threads)
    }

    /// Build a session from an ONNX file.
    pub fn from_file(
        path: &Path,
        device: InferenceDevice,
        intra_threads: Option<usize>,
    ) -> Result<Self> {
        let load_error = |reason: String| Error::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        let mut builder = Session::builder()
            .map_err(|e| load_error(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(e.to_string()))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(|e| load_error(e.to_string()))?;
        }

        let mut builder = configure_device(builder, device).map_err(load_error)?;

        let session = builder
            .commit_from_file(path)
            .map_err(|e| load_error(e.to_string()))?;

        info!("Created ONNX session for {} (device: {device})", path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Regressor for OnnxRegressor {
    fn forward(&self, input: ImageTensor) -> Result<Vec<f32>> {
        let inference_error = |reason: String| Error::Inference { reason };

        let (shape, data) = input.into_parts();
        let tensor = Tensor::from_array((shape, data)).map_err(|e| inference_error(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| inference_error("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| inference_error(e.to_string()))?;

        let (_, values) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_error(e.to_string()))?;

        debug!("Model produced {} output values", values.len());
        Ok(values.to_vec())
    }
}

#[cfg(feature = "cuda")]
fn configure_device(
    builder: SessionBuilder,
    device: InferenceDevice,
) -> std::result::Result<SessionBuilder, String> {
    use ort::execution_providers::CUDAExecutionProvider;

    match device {
        InferenceDevice::Cpu => Ok(builder),
        // ort falls back to CPU when the CUDA provider cannot be registered.
        InferenceDevice::Auto | InferenceDevice::Cuda => builder
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .map_err(|e| e.to_string()),
    }
}

#[cfg(not(feature = "cuda"))]
#[allow(clippy::unnecessary_wraps)]
fn configure_device(
    builder: SessionBuilder,
    device: InferenceDevice,
) -> std::result::Result<SessionBuilder, String> {
    if device == InferenceDevice::Cuda {
        tracing::warn!("CUDA requested but geolocate was built without the `cuda` feature, using CPU");
    }
    Ok(builder)
}
