//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use axum::http::HeaderValue;

/// Parse a CORS origin (`*` or a value usable as an HTTP header).
pub fn parse_origin(s: &str) -> Result<String, String> {
    let origin = s.trim();

    if origin.is_empty() {
        return Err("origin must not be empty".to_string());
    }

    if origin != "*" && HeaderValue::from_str(origin).is_err() {
        return Err(format!("'{origin}' is not a valid origin"));
    }

    Ok(origin.to_string())
}

/// Parse an integer that must be at least 1.
pub fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid positive integer"))?;

    if value == 0 {
        return Err("value must be at least 1".to_string());
    }

    Ok(value)
}
