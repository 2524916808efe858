//! HTTP routes.

use crate::config::ServerConfig;
use crate::constants::{UPLOAD_FIELD, detail};
use crate::error::{Error, Result};
use crate::inference::Prediction;
use crate::server::{ApiError, GeolocationService};
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
}

/// The `file` field of a prediction upload.
struct Upload {
    bytes: Bytes,
    content_type: Option<String>,
}

/// Build the application router.
pub fn router(service: Arc<GeolocationService>, config: &ServerConfig) -> Result<Router> {
    let cors = cors_layer(&config.cors_origins)?;

    Ok(Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin.trim() == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim()).map_err(|_| Error::ConfigValidation {
                message: format!("invalid CORS origin: '{origin}'"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

async fn health(State(service): State<Arc<GeolocationService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: service.is_ready(),
    })
}

async fn predict(
    State(service): State<Arc<GeolocationService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<Prediction>, ApiError> {
    if !service.is_ready() {
        return Err(ApiError::NotReady);
    }

    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected non-multipart upload: {rejection}");
        ApiError::MissingFile
    })?;

    let Upload {
        bytes,
        content_type,
    } = read_upload(&mut multipart).await?;

    debug!(
        "Received upload: {} bytes, content type {:?}",
        bytes.len(),
        content_type
    );

    let prediction = tokio::task::spawn_blocking(move || {
        service.predict_upload(&bytes, content_type.as_deref())
    })
    .await
    .map_err(|e| {
        error!("Prediction task failed: {e}");
        ApiError::Internal
    })??;

    Ok(Json(prediction))
}

async fn read_upload(multipart: &mut Multipart) -> std::result::Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(malformed)?;
        return Ok(Upload {
            bytes,
            content_type,
        });
    }

    Err(ApiError::MissingFile)
}

fn malformed(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge
    } else {
        debug!("Malformed multipart body: {err}");
        ApiError::BadRequest(detail::MALFORMED_UPLOAD)
    }
}
