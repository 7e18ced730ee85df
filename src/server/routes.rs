//! HTTP handlers mapping the surface onto the session and retry policy

use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use crate::error::{Error, Result};
use crate::memory::MemorySnapshot;
use crate::server::state::AppState;
use crate::session::ResetOutcome;
use crate::types::{AskRequest, AskResponse, DocumentInfo, StatusResponse};

/// GET /health - liveness only
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok("Server is running"))
}

/// POST /upload-document - save a text document and activate it
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentInfo>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read file: {}", e)))?;

        tracing::info!("Upload received: {} ({} bytes)", filename, data.len());
        let info = state.session().upload_and_activate(&filename, &data).await?;
        return Ok(Json(info));
    }

    Err(Error::Validation("No file provided".to_string()))
}

/// GET /documents - enumerate the document store
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentInfo>>> {
    Ok(Json(state.session().list_documents()?))
}

/// POST /activate-document/{filename} - swap the active document
pub async fn activate_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<StatusResponse>> {
    state.session().activate(&filename).await.map_err(|e| match e {
        Error::NotFound(_) | Error::Validation(_) => e,
        other => {
            tracing::error!("Failed to activate document '{}': {}", filename, other);
            Error::Internal(format!("Failed to activate document: {}", other))
        }
    })?;

    Ok(Json(StatusResponse::success(format!(
        "Activated document: {} (memory reset)",
        filename
    ))))
}

/// POST /reset-memory - clear conversational memory on the active pipeline
pub async fn reset_memory(State(state): State<AppState>) -> Json<StatusResponse> {
    match state.session().reset_memory() {
        ResetOutcome::Cleared => Json(StatusResponse::success(
            "Conversation memory has been reset",
        )),
        ResetOutcome::NothingToReset => {
            Json(StatusResponse::warning("No memory found to reset"))
        }
    }
}

/// GET /history - debugging view of the conversational memory
pub async fn get_history(State(state): State<AppState>) -> Json<MemorySnapshot> {
    Json(state.session().history())
}

/// POST /ask - answer a question against the active document
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    tracing::info!("Question: \"{}\"", request.input);

    match state.session().ask(&request.input, state.retry()).await {
        Ok(outcome) => Ok(Json(AskResponse {
            answer: outcome.answer,
        })),
        // Retry exhaustion surfaces as 503; everything else is a generic 500
        Err(Error::UpstreamUnavailable) => Err(Error::UpstreamUnavailable),
        Err(e) => {
            tracing::error!("Error in ask_question: {}", e);
            Err(Error::Internal(format!("Error processing request: {}", e)))
        }
    }
}
