use std::path::PathBuf;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised while training, persisting, loading or running the fit pipeline.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Vocabulary is empty: no usable tokens in the training texts")]
    EmptyVocabulary,

    #[error("Degenerate training scores: every score equals {0}, min-max scaling is undefined")]
    DegenerateScores(f64),

    #[error("Invalid training example #{index}: {reason}")]
    InvalidTrainingExample { index: usize, reason: String },

    #[error("Got {labels} labels for {rows} feature rows")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Feature row {row} has length {got}, expected {expected}")]
    RaggedFeatures {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Feature vector has length {got}, classifier was fitted on {expected}")]
    FeatureLengthMismatch { expected: usize, got: usize },

    #[error("Model artifact not found at {0}")]
    ArtifactMissing(PathBuf),

    #[error("Model artifact at {path} is corrupt: {reason}")]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("Model artifact at {path} is incompatible: found {found}, expected {expected}")]
    IncompatibleArtifact {
        path: PathBuf,
        found: String,
        expected: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-boundary error shared by the HTTP and CLI adapters.
///
/// Every variant renders as `{"error": "..."}` with HTTP 200: errors travel in
/// the payload, not the status line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message safe to hand back to a remote caller. Pipeline detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Model(_) | AppError::Internal(_) => {
                "An internal error occurred while predicting".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::debug!("Rejected prediction request: {msg}"),
            AppError::Model(e) => tracing::error!("Model error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        Json(json!({ "error": self.public_message() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::Validation("Score must be between 0 and 100.".to_string());
        assert_eq!(err.public_message(), "Score must be between 0 and 100.");
    }

    #[test]
    fn test_model_error_is_masked() {
        let err = AppError::from(ModelError::FeatureLengthMismatch {
            expected: 21,
            got: 3,
        });
        let msg = err.public_message();
        assert!(!msg.contains("21"), "leaked detail: {msg}");
        assert!(msg.contains("internal error"));
    }

    #[test]
    fn test_error_response_is_ok_status() {
        let response = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
