//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "geolocate";

/// Default address the HTTP listener binds to.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default allowed CORS origin (the bundled web frontend in development).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Default maximum accepted request body size in bytes (32 MiB).
///
/// Large enough for uncompressed 2048x2048 uploads.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Default path to the ONNX model weights, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model.onnx";

/// Name of the multipart form field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

/// Media type prefix an upload must declare to be considered an image.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Number of scalar outputs the regression model produces (longitude, latitude).
pub const MODEL_OUTPUTS: usize = 2;

/// Image transform defaults.
pub mod transform {
    /// Side length of the square model input in pixels.
    pub const IMAGE_SIZE: u32 = 64;

    /// Normalization mean applied to the [0, 1] luminance channel.
    pub const MEAN: f32 = 0.5;

    /// Normalization standard deviation applied to the [0, 1] luminance channel.
    pub const STD: f32 = 0.5;
}

/// Response detail strings.
pub mod detail {
    /// Model has not finished loading.
    pub const NOT_READY: &str = "Model is still loading, please try again shortly";

    /// Upload declared a non-image content type.
    pub const NOT_AN_IMAGE: &str = "File must be an image";

    /// Upload bytes could not be decoded as an image.
    pub const INVALID_IMAGE: &str = "Invalid image file";

    /// Request carried no `file` field.
    pub const MISSING_FILE: &str = "Field required: file";

    /// Upload exceeded the body size limit.
    pub const TOO_LARGE: &str = "Upload exceeds the maximum allowed size";

    /// Multipart body could not be parsed.
    pub const MALFORMED_UPLOAD: &str = "Malformed multipart upload";

    /// Unexpected server-side failure.
    pub const PREDICTION_FAILED: &str = "Prediction failed";
}
