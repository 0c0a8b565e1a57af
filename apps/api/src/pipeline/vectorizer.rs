//! TF-IDF vectorizer over normalized text.
//!
//! Vocabulary indices follow the lexicographic order of the tokens, so index `i`
//! names the same token before and after a save/load cycle.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Fitted TF-IDF state: token → column index plus one smoothed idf weight per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
}

/// Splits normalized text into vectorizer terms: runs of word characters, two or more long.
fn analyze(document: &str) -> impl Iterator<Item = &str> {
    document
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| term.chars().count() >= 2)
}

impl TfidfVectorizer {
    /// Learns the vocabulary and idf weights from a corpus of normalized documents.
    ///
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
    pub fn fit(documents: &[String]) -> Result<Self, ModelError> {
        if documents.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<&str> = analyze(doc).collect();
            for term in unique {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());

        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Ok(TfidfVectorizer { vocabulary, idf })
    }

    /// Number of columns produced by [`transform`](Self::transform).
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Maps one normalized document to its L2-normalized tf-idf vector.
    ///
    /// Unknown terms are dropped; a document with no known terms is all zeros.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut weights = vec![0.0; self.vocabulary.len()];

        for term in analyze(document) {
            if let Some(&idx) = self.vocabulary.get(term) {
                weights[idx] += 1.0;
            }
        }

        for (w, idf) in weights.iter_mut().zip(&self.idf) {
            *w *= idf;
        }

        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in &mut weights {
                *w /= norm;
            }
        }

        weights
    }

    /// Checks the idf table covers exactly the vocabulary indices.
    pub(crate) fn is_consistent(&self) -> bool {
        let n = self.vocabulary.len();
        self.idf.len() == n
            && self.vocabulary.values().collect::<BTreeSet<_>>().len() == n
            && self.vocabulary.values().all(|&idx| idx < n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "rust tokio axum".to_string(),
            "rust python".to_string(),
            "python django".to_string(),
        ]
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let v = TfidfVectorizer::fit(&corpus()).unwrap();
        let terms: Vec<&str> = v.vocabulary.keys().map(String::as_str).collect();
        assert_eq!(terms, vec!["axum", "django", "python", "rust", "tokio"]);
        assert_eq!(v.vocabulary["axum"], 0);
        assert_eq!(v.vocabulary["tokio"], 4);
        assert!(v.is_consistent());
    }

    #[test]
    fn test_idf_is_smoothed() {
        let v = TfidfVectorizer::fit(&corpus()).unwrap();
        // rust: df = 2, n = 3
        let expected = (4.0_f64 / 3.0).ln() + 1.0;
        assert!((v.idf[v.vocabulary["rust"]] - expected).abs() < 1e-12);
        // axum: df = 1
        let expected = (4.0_f64 / 2.0).ln() + 1.0;
        assert!((v.idf[v.vocabulary["axum"]] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_char_terms_ignored() {
        let v = TfidfVectorizer::fit(&["5 years x experience".to_string()]).unwrap();
        assert_eq!(v.len(), 2);
        assert!(!v.vocabulary.contains_key("5"));
    }

    #[test]
    fn test_transform_is_unit_length() {
        let v = TfidfVectorizer::fit(&corpus()).unwrap();
        let w = v.transform("rust rust axum");
        let norm = w.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(w[v.vocabulary["rust"]] > 0.0);
        assert_eq!(w[v.vocabulary["django"]], 0.0);
    }

    #[test]
    fn test_unknown_and_empty_text_is_all_zero() {
        let v = TfidfVectorizer::fit(&corpus()).unwrap();
        assert_eq!(v.transform(""), vec![0.0; 5]);
        assert_eq!(v.transform("golang kotlin"), vec![0.0; 5]);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        assert!(matches!(
            TfidfVectorizer::fit(&[]),
            Err(ModelError::EmptyTrainingSet)
        ));
        assert!(matches!(
            TfidfVectorizer::fit(&["".to_string(), "a".to_string()]),
            Err(ModelError::EmptyVocabulary)
        ));
    }
}
