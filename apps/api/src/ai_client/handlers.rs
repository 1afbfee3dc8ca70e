//! Axum route handlers for the AI pass-through API.
//!
//! These forward to whichever providers are configured. Unconfigured
//! capabilities answer 503 so clients can show a dismissible notice.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::ai_client::prompts::COUNSELLOR_SYSTEM;
use crate::ai_client::{CapabilitySet, Completion, VoiceSession, VoiceSessionRequest};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub prompt: String,
    pub system: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// GET /api/v1/capabilities
pub async fn handle_capabilities(State(state): State<AppState>) -> Json<CapabilitySet> {
    Json(state.ai.available())
}

/// POST /api/v1/ai/complete
pub async fn handle_complete(
    State(state): State<AppState>,
    Json(request): Json<CompleteRequest>,
) -> Result<Json<Completion>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    let system = request.system.as_deref().unwrap_or(COUNSELLOR_SYSTEM);
    Ok(Json(state.ai.complete(&request.prompt, system).await?))
}

/// POST /api/v1/ai/speech
///
/// Returns raw audio with the provider's content type.
pub async fn handle_speech(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Response, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let audio = state.ai.synthesize_speech(&request.text).await?;
    Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response())
}

/// POST /api/v1/ai/voice-sessions
pub async fn handle_voice_session(
    State(state): State<AppState>,
    Json(request): Json<VoiceSessionRequest>,
) -> Result<Json<VoiceSession>, AppError> {
    if request.phone_number.trim().is_empty() {
        return Err(AppError::Validation(
            "phone_number cannot be empty".to_string(),
        ));
    }
    Ok(Json(state.ai.start_voice_session(&request).await?))
}
