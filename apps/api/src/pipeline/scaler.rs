use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Min-max mapping of raw 0–100 scores, fitted on the training scores.
///
/// Inference reuses the training bounds and does not clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreScaler {
    pub min: f64,
    pub max: f64,
}

impl ScoreScaler {
    pub fn fit(scores: &[f64]) -> Result<Self, ModelError> {
        if scores.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
            return Err(ModelError::InvalidTrainingExample {
                index,
                reason: "score is not a finite number".to_string(),
            });
        }

        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Err(ModelError::DegenerateScores(min));
        }

        Ok(ScoreScaler { min, max })
    }

    pub fn transform(&self, score: f64) -> f64 {
        (score - self.min) / (self.max - self.min)
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }
}
