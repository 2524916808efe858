//! Configuration type definitions.

use crate::constants::{
    DEFAULT_CORS_ORIGIN, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL_PATH, DEFAULT_PORT,
    transform,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Image preprocessing settings.
    #[serde(default)]
    pub transform: TransformConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Origins allowed to make cross-origin requests. `*` allows any origin.
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Socket address string in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Model artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: PathBuf,

    /// Device to run inference on.
    pub device: InferenceDevice,

    /// Intra-op thread count for the runtime (None = runtime default).
    pub intra_threads: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            device: InferenceDevice::default(),
            intra_threads: None,
        }
    }
}

/// Inference device configuration.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Use CUDA when compiled in and available, else CPU.
    #[default]
    Auto,
    /// Force CPU inference.
    Cpu,
    /// Request CUDA; falls back to CPU with a warning if unavailable.
    Cuda,
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda => write!(f, "cuda"),
        }
    }
}

/// Image preprocessing settings.
///
/// Must match the preprocessing the model was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Side length of the square model input.
    pub image_size: u32,

    /// Normalization mean.
    pub mean: f32,

    /// Normalization standard deviation.
    pub std: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            image_size: transform::IMAGE_SIZE,
            mean: transform::MEAN,
            std: transform::STD,
        }
    }
}
