use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::FitClassifier;

/// Raw score as sent by clients: usually a string such as `"85%"`, sometimes a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Text(String),
    Number(f64),
}

/// Parses a raw score string: trims, strips one trailing `%`, requires 0 ≤ score ≤ 100.
pub fn parse_score(raw: &str) -> Result<f64, AppError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    let score: f64 = number.parse().map_err(|_| {
        AppError::Validation(format!("Score must be a number, got '{}'.", raw.trim()))
    })?;

    check_range(score)
}

fn check_range(score: f64) -> Result<f64, AppError> {
    if !score.is_finite() {
        return Err(AppError::Validation(
            "Score must be a finite number.".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&score) {
        return Err(AppError::Validation(
            "Score must be between 0 and 100.".to_string(),
        ));
    }
    Ok(score)
}

impl RawScore {
    pub fn parse(&self) -> Result<f64, AppError> {
        match self {
            RawScore::Text(raw) => parse_score(raw),
            RawScore::Number(n) => check_range(*n),
        }
    }
}

/// Validates the raw inputs and runs the classifier. Shared by the HTTP and CLI adapters.
pub fn predict_raw(
    classifier: &dyn FitClassifier,
    raw_score: &RawScore,
    cover_letter: &str,
) -> Result<String, AppError> {
    let score = raw_score.parse()?;
    Ok(classifier.classify(score, cover_letter)?)
}
