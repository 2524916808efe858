//! Mapping of request outcomes to HTTP responses.

use crate::constants::detail;
use crate::server::PredictError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: &'static str,
}

/// Request-level failure with its HTTP status.
#[derive(Debug)]
pub enum ApiError {
    /// 503: model still loading.
    NotReady,
    /// 400: upload rejected by validation.
    BadRequest(&'static str),
    /// 413: upload exceeds the configured size limit.
    TooLarge,
    /// 422: no `file` field in the form.
    MissingFile,
    /// 500: unexpected server-side failure.
    Internal,
}

impl ApiError {
    /// Status code for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable reason sent to the client.
    pub const fn detail(&self) -> &'static str {
        match self {
            Self::NotReady => detail::NOT_READY,
            Self::BadRequest(reason) => *reason,
            Self::TooLarge => detail::TOO_LARGE,
            Self::MissingFile => detail::MISSING_FILE,
            Self::Internal => detail::PREDICTION_FAILED,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::NotReady => Self::NotReady,
            PredictError::Rejected(rejection) => Self::BadRequest(rejection.detail()),
            PredictError::Internal(e) => {
                error!("Prediction failed: {e}");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
