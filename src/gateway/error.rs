use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::DOCENT_STATUS_HEADER;
use crate::ingest::{ExtractError, IngestError};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("unprocessable document: {0}")]
    Unprocessable(String),

    #[error("duplicate document: {0}")]
    Duplicate(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("extractor unavailable: {0}")]
    ExtractorUnavailable(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<IngestError> for GatewayError {
    fn from(err: IngestError) -> Self {
        let message = err.to_string();
        match err {
            IngestError::EmptyUpload | IngestError::Unsupported { .. } => {
                GatewayError::InvalidRequest(message)
            }
            IngestError::TooLarge { .. } => GatewayError::PayloadTooLarge(message),
            IngestError::NoText { .. } => GatewayError::Unprocessable(message),
            IngestError::Extraction(ExtractError::ToolUnavailable { .. }) => {
                GatewayError::ExtractorUnavailable(message)
            }
            IngestError::Extraction(_) => GatewayError::Unprocessable(message),
            IngestError::Duplicate { .. } => GatewayError::Duplicate(message),
            IngestError::NotFound { .. } => GatewayError::NotFound(message),
            IngestError::Storage(_) => GatewayError::StorageUnavailable(message),
            IngestError::Internal(_) => GatewayError::InternalError(message),
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(rejection: MultipartRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge(err.body_text())
        } else {
            GatewayError::InvalidRequest(err.body_text())
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, docent_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::PayloadTooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
            }
            GatewayError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "no_text"),
            GatewayError::Duplicate(_) => (StatusCode::CONFLICT, "duplicate"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            GatewayError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
            }
            GatewayError::ExtractorUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "extractor_unavailable")
            }
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(DOCENT_STATUS_HEADER, HeaderValue::from_static(docent_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
