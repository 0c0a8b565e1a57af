//! Axum route handlers for the Prediction API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::prediction::input::{predict_raw, RawScore};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub score: RawScore,
    #[serde(rename = "coverLetter")]
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /predict/
///
/// Classifies an applicant as Fit / Moderate / Not Fit.
/// Malformed bodies are reported as `{"error": ...}` like every other failure.
pub async fn handle_predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let prediction = predict_raw(
        state.classifier.as_ref(),
        &request.score,
        &request.cover_letter,
    )?;

    debug!(score = ?request.score, %prediction, "Prediction served");

    Ok(Json(PredictResponse { prediction }))
}
