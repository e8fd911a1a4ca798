//! HTTP gateway (Axum) for document upload and chat.
//!
//! This module is primarily used by the `docent` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{
        HeaderMap, HeaderName, Method, StatusCode, header,
        header::{HeaderValue, InvalidHeaderValue},
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    chat_message_handler, delete_document_handler, list_documents_handler,
    upload_document_handler,
};
pub use state::HandlerState;

use crate::constants::{
    DOCENT_STATUS_ERROR, DOCENT_STATUS_HEADER, DOCENT_STATUS_HEALTHY, DOCENT_STATUS_NOT_READY,
    DOCENT_STATUS_READY,
};

/// Room for multipart boundaries and headers on top of the upload limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router_with_state(state: HandlerState) -> Router {
    let body_limit = state
        .ingest
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/documents", get(list_documents_handler))
        .route(
            "/api/documents/upload",
            post(upload_document_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/documents/{id}", delete(delete_document_handler))
        .route("/api/chat/message", post(chat_message_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy admitting the browser frontend at `origin`.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static("x-docent-status")]))
}

pub(crate) fn status_response<T: Serialize>(
    status: StatusCode,
    docent_status: &'static str,
    body: T,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(DOCENT_STATUS_HEADER, HeaderValue::from_static(docent_status));

    (status, headers, Json(body)).into_response()
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub storage: &'static str,
    pub documents: usize,
    pub synthesis: &'static str,
    pub generator: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    status_response(
        StatusCode::OK,
        DOCENT_STATUS_HEALTHY,
        HealthResponse { status: "ok" },
    )
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let storage_status = if state.ingest.archive_available() {
        DOCENT_STATUS_READY
    } else {
        DOCENT_STATUS_ERROR
    };

    let components = ComponentStatus {
        http: DOCENT_STATUS_READY,
        storage: storage_status,
        documents: state.pipeline.corpus().snapshot().documents().len(),
        synthesis: state.pipeline.synthesis_mode().as_str(),
        generator: state.generator_mode(),
    };

    let is_ready = components.storage == DOCENT_STATUS_READY;

    let (status_code, docent_status, status_msg) = if is_ready {
        (StatusCode::OK, DOCENT_STATUS_READY, "ok")
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            DOCENT_STATUS_NOT_READY,
            "pending",
        )
    };

    status_response(
        status_code,
        docent_status,
        ReadyResponse {
            status: status_msg,
            components,
        },
    )
}
