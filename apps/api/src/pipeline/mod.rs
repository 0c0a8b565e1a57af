//! Applicant fit pipeline — text cleaning, tf-idf, score scaling, random forest.
//!
//! Training and serving share [`FitPipeline::features`], so the feature vector a
//! request sees is computed exactly as it was at fit time.
//!
//! `AppState` holds an `Arc<dyn FitClassifier>`; tests swap in stubs.

pub mod dataset;
pub mod features;
pub mod forest;
pub mod scaler;
pub mod store;
pub mod text;
pub mod vectorizer;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ModelError;
use crate::pipeline::dataset::{validate_examples, TrainingExample};
use crate::pipeline::forest::{ForestParams, RandomForest};
use crate::pipeline::scaler::ScoreScaler;
use crate::pipeline::text::clean_text;
use crate::pipeline::vectorizer::TfidfVectorizer;

/// Classifies an applicant from a validated score and cover letter.
///
/// Implement this to swap backends without touching the handlers or the CLI.
pub trait FitClassifier: Send + Sync {
    fn classify(&self, score: f64, cover_letter: &str) -> Result<String, ModelError>;
}

/// The trained triple. Built once by [`FitPipeline::train`], never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitPipeline {
    pub classifier: RandomForest,
    pub vectorizer: TfidfVectorizer,
    pub scaler: ScoreScaler,
}

impl FitPipeline {
    pub fn train(examples: &[TrainingExample], params: &ForestParams) -> Result<Self, ModelError> {
        validate_examples(examples)?;

        let cleaned: Vec<String> = examples
            .iter()
            .map(|e| clean_text(&e.cover_letter))
            .collect();
        let scores: Vec<f64> = examples.iter().map(|e| e.score).collect();
        let labels: Vec<String> = examples.iter().map(|e| e.label.clone()).collect();

        let vectorizer = TfidfVectorizer::fit(&cleaned)?;
        let scaler = ScoreScaler::fit(&scores)?;

        let rows: Vec<Vec<f64>> = cleaned
            .iter()
            .zip(&scores)
            .map(|(text, &score)| assemble_row(&vectorizer, &scaler, text, score))
            .collect();

        let classifier = RandomForest::fit(&rows, &labels, params)?;

        info!(
            examples = examples.len(),
            vocabulary = vectorizer.len(),
            trees = classifier.n_trees(),
            classes = ?classifier.classes(),
            "Trained fit pipeline"
        );

        Ok(FitPipeline {
            classifier,
            vectorizer,
            scaler,
        })
    }

    /// Feature vector for a raw score and un-normalized cover letter.
    pub fn features(&self, score: f64, cover_letter: &str) -> Vec<f64> {
        assemble_row(&self.vectorizer, &self.scaler, &clean_text(cover_letter), score)
    }

    /// Class probabilities, aligned with [`RandomForest::classes`].
    pub fn predict_proba(&self, score: f64, cover_letter: &str) -> Result<Vec<f64>, ModelError> {
        self.classifier
            .predict_proba(&self.features(score, cover_letter))
    }

    pub fn predict(&self, score: f64, cover_letter: &str) -> Result<String, ModelError> {
        let features = self.features(score, cover_letter);
        self.classifier.predict(&features).map(str::to_string)
    }

    /// The three parts agree on feature width and hold sane parameters.
    pub fn is_consistent(&self) -> bool {
        self.vectorizer.is_consistent()
            && self.scaler.is_consistent()
            && self.classifier.is_consistent()
            && self.classifier.n_features() == self.vectorizer.len() + 1
    }
}

impl FitClassifier for FitPipeline {
    fn classify(&self, score: f64, cover_letter: &str) -> Result<String, ModelError> {
        self.predict(score, cover_letter)
    }
}

fn assemble_row(
    vectorizer: &TfidfVectorizer,
    scaler: &ScoreScaler,
    cleaned: &str,
    score: f64,
) -> Vec<f64> {
    features::assemble(vectorizer.transform(cleaned), scaler.transform(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::dataset::builtin_examples;

    fn trained() -> FitPipeline {
        FitPipeline::train(&builtin_examples(), &ForestParams::default()).unwrap()
    }

    #[test]
    fn test_trained_pipeline_is_consistent() {
        let pipeline = trained();
        assert!(pipeline.is_consistent());
        assert_eq!(
            pipeline.classifier.classes(),
            &["Fit".to_string(), "Moderate".to_string(), "Not Fit".to_string()]
        );
    }

    #[test]
    fn test_feature_width_is_vocabulary_plus_score() {
        let pipeline = trained();
        let features = pipeline.features(90.0, "anything at all");
        assert_eq!(features.len(), pipeline.vectorizer.len() + 1);
    }

    #[test]
    fn test_score_scaled_with_training_bounds() {
        let pipeline = trained();
        let features = pipeline.features(90.0, "");
        assert_eq!(features.last().copied(), Some(1.0));
        let features = pipeline.features(30.0, "");
        assert_eq!(features.last().copied(), Some(0.0));
    }

    #[test]
    fn test_empty_text_still_labels() {
        let pipeline = trained();
        let features = pipeline.features(70.0, "");
        assert!(features[..features.len() - 1].iter().all(|&w| w == 0.0));
        let label = pipeline.predict(70.0, "").unwrap();
        assert!(pipeline.classifier.classes().contains(&label));
    }

    #[test]
    fn test_matching_training_example_is_fit() {
        let pipeline = trained();
        let label = pipeline
            .predict(90.0, "I have 5 years of experience in MERN stack.")
            .unwrap();
        assert_eq!(label, "Fit");
    }

    #[test]
    fn test_low_score_no_experience_is_not_fit() {
        let pipeline = trained();
        let label = pipeline.predict(30.0, "I have no experience.").unwrap();
        assert_eq!(label, "Not Fit");
    }

    #[test]
    fn test_training_is_deterministic() {
        assert_eq!(trained(), trained());
    }

    #[test]
    fn test_degenerate_scores_halt_training() {
        let examples = vec![
            TrainingExample::new(50.0, "rust developer", "Fit"),
            TrainingExample::new(50.0, "python developer", "Not Fit"),
        ];
        let err = FitPipeline::train(&examples, &ForestParams::default()).unwrap_err();
        assert!(matches!(err, ModelError::DegenerateScores(_)));
    }

    #[test]
    fn test_classify_matches_predict() {
        let pipeline = trained();
        let classifier: &dyn FitClassifier = &pipeline;
        let text = "I am skilled in React";
        assert_eq!(
            classifier.classify(85.0, text).unwrap(),
            pipeline.predict(85.0, text).unwrap()
        );
    }

    #[test]
    fn test_predict_proba_over_all_classes() {
        let pipeline = trained();
        let proba = pipeline.predict_proba(60.0, "eager to learn").unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
