//! Symptom vocabulary and multi-label feature encoding.
//!
//! The vocabulary is the frozen, ordered set of distinct symptom tokens the
//! model was trained on, together with the token → index bijection. It is
//! built once at training time, persisted as an ordered list, and reloaded
//! verbatim at serving time. Encoding depends on the stored order, so the
//! order is never re-derived.
//!
//! `encode` is the multi-label binarizer: it turns any symptom list into a
//! fixed-width binary vector over the vocabulary. Tokens outside the
//! vocabulary are ignored and duplicates collapse to a single presence bit.

use healthinsight_core::TrainingExample;
use std::collections::{BTreeSet, HashMap};

/// The frozen, indexed symptom feature space.
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    /// Build a vocabulary from an explicit, ordered token list.
    ///
    /// Tokens must be distinct; this is the constructor used when loading
    /// the persisted artifact, which stores the training-time order.
    #[must_use]
    pub fn new(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();
        Self { tokens, index }
    }

    /// Derive the vocabulary from training examples.
    ///
    /// Collects the union of all symptom tokens and fixes their order
    /// lexicographically, so the result is deterministic regardless of row
    /// order. Empty tokens never reach this point (cell cleaning happens
    /// while the table is parsed).
    #[must_use]
    pub fn from_examples(examples: &[TrainingExample]) -> Self {
        let union: BTreeSet<&str> = examples
            .iter()
            .flat_map(|example| example.symptoms.iter().map(String::as_str))
            .collect();
        Self::new(union.into_iter().map(str::to_string).collect())
    }

    /// Tokens in their frozen index order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of features (V).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of a token, or `None` when the token is not in the vocabulary.
    #[must_use]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Encode a symptom list as a binary feature vector of length V.
    ///
    /// Unknown tokens are skipped; duplicated tokens set the same component
    /// once, so encoding is idempotent under de-duplication.
    #[must_use]
    pub fn encode(&self, symptoms: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0_f64; self.tokens.len()];
        for symptom in symptoms {
            if let Some(idx) = self.index_of(symptom) {
                vector[idx] = 1.0;
            }
        }
        vector
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn example(disease: &str, symptoms: &[&str]) -> TrainingExample {
        TrainingExample::new(
            disease.to_string(),
            symptoms.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_from_examples_sorted_distinct() {
        let examples = vec![
            example("Fungal infection", &["skin_rash", "itching", "itching"]),
            example("Common Cold", &["fatigue", "skin_rash"]),
        ];
        let vocab = SymptomVocabulary::from_examples(&examples);
        assert_eq!(vocab.tokens(), &["fatigue", "itching", "skin_rash"]);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_from_examples_row_order_irrelevant() {
        let forward = vec![
            example("A", &["cough", "fever"]),
            example("B", &["chills"]),
        ];
        let reversed = vec![
            example("B", &["chills"]),
            example("A", &["fever", "cough"]),
        ];
        let vocab_a = SymptomVocabulary::from_examples(&forward);
        let vocab_b = SymptomVocabulary::from_examples(&reversed);
        assert_eq!(vocab_a.tokens(), vocab_b.tokens());
    }

    #[test]
    fn test_index_of_known_and_unknown() {
        let vocab = SymptomVocabulary::new(vec![
            "fatigue".to_string(),
            "itching".to_string(),
            "skin_rash".to_string(),
        ]);
        assert_eq!(vocab.index_of("itching"), Some(1));
        assert_eq!(vocab.index_of("headache"), None);
    }

    #[test]
    fn test_encode_sets_presence_bits() {
        let vocab = SymptomVocabulary::new(vec![
            "fatigue".to_string(),
            "itching".to_string(),
            "skin_rash".to_string(),
        ]);
        let vector = vocab.encode(&["itching".to_string(), "skin_rash".to_string()]);
        assert_eq!(vector, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_encode_idempotent_under_duplicates() {
        let vocab = SymptomVocabulary::new(vec![
            "fatigue".to_string(),
            "itching".to_string(),
        ]);
        let duplicated = vocab.encode(&[
            "itching".to_string(),
            "itching".to_string(),
            "itching".to_string(),
        ]);
        let deduplicated = vocab.encode(&["itching".to_string()]);
        assert_eq!(duplicated, deduplicated);
    }

    #[test]
    fn test_encode_ignores_unknown_tokens() {
        let vocab = SymptomVocabulary::new(vec!["fatigue".to_string()]);
        let vector = vocab.encode(&[
            "not_a_real_symptom".to_string(),
            "fatigue".to_string(),
        ]);
        assert_eq!(vector, vec![1.0]);
    }

    #[test]
    fn test_encode_stable_across_calls() {
        let vocab = SymptomVocabulary::new(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]);
        let symptoms = vec!["c".to_string(), "a".to_string()];
        assert_eq!(vocab.encode(&symptoms), vocab.encode(&symptoms));
    }

    #[test]
    fn test_encode_empty_input() {
        let vocab = SymptomVocabulary::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(vocab.encode(&[]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let vocab = SymptomVocabulary::from_examples(&[]);
        assert!(vocab.is_empty());
        assert_eq!(vocab.encode(&["anything".to_string()]), Vec::<f64>::new());
    }
}
