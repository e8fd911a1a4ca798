use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use tracing::{debug, instrument};

use crate::constants::{
    DOCENT_STATUS_GROUNDED, DOCENT_STATUS_LISTED, DOCENT_STATUS_NO_DOCUMENTS,
    DOCENT_STATUS_OUT_OF_SCOPE, DOCENT_STATUS_REMOVED, DOCENT_STATUS_STORED,
};
use crate::corpus::DocumentId;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{ChatRequest, ChatResponse};
use crate::gateway::state::HandlerState;
use crate::gateway::status_response;
use crate::synthesis::Provenance;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

#[instrument(skip(state, multipart))]
pub async fn upload_document_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        let summary = state.ingest.ingest_upload(&file_name, &bytes).await?;

        return Ok(status_response(
            StatusCode::OK,
            DOCENT_STATUS_STORED,
            summary,
        ));
    }

    Err(GatewayError::InvalidRequest(format!(
        "missing multipart field '{UPLOAD_FIELD}'"
    )))
}

#[instrument(skip(state))]
pub async fn list_documents_handler(State(state): State<HandlerState>) -> Response {
    status_response(StatusCode::OK, DOCENT_STATUS_LISTED, state.ingest.list())
}

#[instrument(skip(state, id))]
pub async fn delete_document_handler(
    State(state): State<HandlerState>,
    id: Result<Path<DocumentId>, PathRejection>,
) -> Result<Response, GatewayError> {
    let Path(id) = id?;
    let removed = state.ingest.remove(id).await?;

    Ok(status_response(
        StatusCode::OK,
        DOCENT_STATUS_REMOVED,
        removed,
    ))
}

/// Answers one question from the ingested documents.
///
/// Refusals are ordinary 200 responses; only a malformed body is an error.
#[instrument(skip(state, payload))]
pub async fn chat_message_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = payload?;
    let outcome = state.pipeline.answer(&request.message).await;

    let docent_status = match outcome.answer.provenance {
        Provenance::Documents => DOCENT_STATUS_GROUNDED,
        Provenance::OutOfScope => DOCENT_STATUS_OUT_OF_SCOPE,
        Provenance::NoDocuments => DOCENT_STATUS_NO_DOCUMENTS,
    };

    let body = ChatResponse {
        message: request.message,
        response: outcome.answer.text,
        source: outcome.answer.provenance,
        timestamp: Utc::now().timestamp_millis(),
        strategy: outcome.answer.strategy,
    };

    Ok(status_response(StatusCode::OK, docent_status, body))
}
