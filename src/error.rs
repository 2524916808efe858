//! Error types for geolocate.

/// Result type alias for geolocate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for geolocate.
///
/// These are process-level or internal failures. Per-request rejections
/// (model still loading, bad uploads) are modelled separately by
/// [`crate::server::PredictError`] and [`crate::imaging::ImageRejection`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Model weights file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Model could not be constructed from its artifact.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: std::path::PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// A model was already installed into the service.
    #[error("model is already loaded")]
    ModelAlreadyLoaded,

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Model produced an output vector of unexpected length.
    #[error("model produced {actual} outputs, expected {expected}")]
    OutputShape {
        /// Number of outputs the engine requires.
        expected: usize,
        /// Number of outputs the model produced.
        actual: usize,
    },

    /// Failed to read an image file from disk.
    #[error("failed to read image '{path}': {source}")]
    ImageRead {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Image file could not be decoded.
    #[error("invalid image '{path}': {source}")]
    InvalidImage {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Decoder rejection.
        #[source]
        source: crate::imaging::ImageRejection,
    },

    /// One or more images could not be processed by the `predict` command.
    #[error("{failed} of {total} images could not be processed")]
    PredictFailures {
        /// Number of failed images.
        failed: usize,
        /// Number of images attempted.
        total: usize,
    },

    /// Failed to bind the HTTP listener.
    #[error("failed to bind '{address}'")]
    Bind {
        /// Address that could not be bound.
        address: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// HTTP server terminated with an error.
    #[error("HTTP server error")]
    Serve {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_shape_message() {
        let err = Error::OutputShape {
            expected: 2,
            actual: 5,
        };
        assert_eq!(err.to_string(), "model produced 5 outputs, expected 2");
    }

    #[test]
    fn test_model_load_message_includes_path() {
        let err = Error::ModelLoad {
            path: "weights/model.onnx".into(),
            reason: "truncated protobuf".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("weights/model.onnx"));
        assert!(msg.contains("truncated protobuf"));
    }

    #[test]
    fn test_image_read_message_includes_cause() {
        let err = Error::ImageRead {
            path: "scenes/tile.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("scenes/tile.png"));
        assert!(msg.contains("access denied"));
    }
}
