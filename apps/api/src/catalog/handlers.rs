//! Axum route handlers for the Catalog API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::catalog::matcher::match_cutoffs;
use crate::catalog::{CategoryCode, College, Suggestion};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub score: f64,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub score: f64,
    pub category: CategoryCode,
    pub suggestions: Vec<Suggestion>,
}

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<Vec<College>> {
    Json(state.catalog.colleges().to_vec())
}

/// POST /api/v1/match
///
/// Runs the cutoff matcher directly, bypassing intent classification.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if !request.score.is_finite() || request.score < 0.0 {
        return Err(AppError::Validation(
            "score must be a non-negative number".to_string(),
        ));
    }
    let category = request
        .category
        .parse::<CategoryCode>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let suggestions = match_cutoffs(request.score, category, &state.catalog);
    Ok(Json(MatchResponse {
        score: request.score,
        category,
        suggestions,
    }))
}
