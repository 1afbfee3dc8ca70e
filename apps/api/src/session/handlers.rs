//! Axum route handlers for the Chat API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::models::{Exchange, HistoryEntry, ResetOutcome, Session};
use crate::session::store::MAX_HISTORY_ENTRIES;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = MAX_HISTORY_ENTRIES;

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = state.chat.start_session().await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.chat.session(id).await?))
}

/// POST /api/v1/sessions/:id/messages
///
/// Classifies the message, runs the cutoff matcher when a score and category
/// are present, and returns both turns. 409 while a previous reply is pending.
pub async fn handle_submit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitMessageRequest>,
) -> Result<Json<Exchange>, AppError> {
    Ok(Json(state.chat.submit(id, &request.text).await?))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResetOutcome>, AppError> {
    Ok(Json(state.chat.reset(id).await?))
}

/// GET /api/v1/history?limit=
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    Ok(Json(state.chat.history(limit).await?))
}
