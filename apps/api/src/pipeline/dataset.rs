use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// One labeled applicant: raw score, cover letter and fitness label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub score: f64,
    #[serde(rename = "coverLetter")]
    pub cover_letter: String,
    pub label: String,
}

impl TrainingExample {
    pub fn new(score: f64, cover_letter: &str, label: &str) -> Self {
        Self {
            score,
            cover_letter: cover_letter.to_string(),
            label: label.to_string(),
        }
    }
}

/// The built-in training set.
pub fn builtin_examples() -> Vec<TrainingExample> {
    vec![
        TrainingExample::new(90.0, "I have 5 years of experience in MERN stack.", "Fit"),
        TrainingExample::new(
            85.0,
            "I am skilled in React and Node.js with great projects.",
            "Fit",
        ),
        TrainingExample::new(
            60.0,
            "I am a fresher but eager to learn new technologies.",
            "Moderate",
        ),
        TrainingExample::new(
            50.0,
            "I have basic programming knowledge and want to grow.",
            "Not Fit",
        ),
        TrainingExample::new(30.0, "I have no experience but I am interested.", "Not Fit"),
    ]
}

/// Reads a JSON array of training examples (`score`, `coverLetter`, `label`).
pub fn load_examples(path: &Path) -> Result<Vec<TrainingExample>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let examples: Vec<TrainingExample> = serde_json::from_str(&raw)
        .with_context(|| format!("Dataset {} is not a JSON array of examples", path.display()))?;
    Ok(examples)
}

/// Rejects examples that would poison training: out-of-range scores or blank labels.
pub fn validate_examples(examples: &[TrainingExample]) -> Result<(), ModelError> {
    if examples.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }

    for (index, example) in examples.iter().enumerate() {
        if !example.score.is_finite() || !(0.0..=100.0).contains(&example.score) {
            return Err(ModelError::InvalidTrainingExample {
                index,
                reason: format!("score {} is outside 0..=100", example.score),
            });
        }
        if example.label.trim().is_empty() {
            return Err(ModelError::InvalidTrainingExample {
                index,
                reason: "label is empty".to_string(),
            });
        }
    }

    Ok(())
}
