//! Configuration validation.

use crate::config::{Config, ServerConfig, TransformConfig};
use crate::error::{Error, Result};
use axum::http::HeaderValue;

/// Validate the entire configuration.
///
/// The model artifact is not checked here; a missing or broken artifact is
/// reported by the loader as a startup fault.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(&config.server)?;
    validate_transform(&config.transform)?;

    if config.model.intra_threads == Some(0) {
        return Err(Error::ConfigValidation {
            message: "intra_threads must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate server settings.
fn validate_server(server: &ServerConfig) -> Result<()> {
    if server.port == 0 {
        return Err(Error::ConfigValidation {
            message: "port must be between 1 and 65535".to_string(),
        });
    }

    if server.max_upload_bytes == 0 {
        return Err(Error::ConfigValidation {
            message: "max_upload_bytes must be at least 1".to_string(),
        });
    }

    if server.cors_origins.is_empty() {
        return Err(Error::ConfigValidation {
            message: "cors_origins must list at least one origin (use \"*\" to allow any)"
                .to_string(),
        });
    }

    for origin in &server.cors_origins {
        if origin.trim().is_empty() || HeaderValue::from_str(origin.trim()).is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid CORS origin: '{origin}'"),
            });
        }
    }

    Ok(())
}

/// Validate image preprocessing settings.
fn validate_transform(transform: &TransformConfig) -> Result<()> {
    if transform.image_size == 0 {
        return Err(Error::ConfigValidation {
            message: "image_size must be at least 1".to_string(),
        });
    }

    if !transform.mean.is_finite() {
        return Err(Error::ConfigValidation {
            message: format!("mean must be finite, got {}", transform.mean),
        });
    }

    if !transform.std.is_finite() || transform.std <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("std must be positive and finite, got {}", transform.std),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_upload_limit() {
        let mut config = Config::default();
        config.server.max_upload_bytes = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_origins() {
        let mut config = Config::default();
        config.server.cors_origins.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_origin_with_control_characters() {
        let mut config = Config::default();
        config.server.cors_origins = vec!["http://bad\norigin".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_wildcard_origin() {
        let mut config = Config::default();
        config.server.cors_origins = vec!["*".to_string()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_image_size() {
        let mut config = Config::default();
        config.transform.image_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_positive_std() {
        let mut config = Config::default();
        config.transform.std = 0.0;
        assert!(validate_config(&config).is_err());

        config.transform.std = f32::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_finite_mean() {
        let mut config = Config::default();
        config.transform.mean = f32::INFINITY;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_threads() {
        let mut config = Config::default();
        config.model.intra_threads = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
