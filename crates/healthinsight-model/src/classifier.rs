//! Naive Bayes classifier over binary symptom features.
//!
//! The model is an explicit typed structure (ordered class list, priors,
//! per-class log-likelihoods) rather than an opaque blob, so the arithmetic
//! is fully visible and the artifact stays inspectable on disk.
//!
//! # Estimation
//!
//! For each class `c` and feature `i`, the presence likelihood is estimated
//! with additive (Laplace) smoothing over symptom presence counts:
//!
//! ```text
//! P(feature_i = 1 | c) = (count_i_in_c + α) / (rows_in_c + 2α)
//! ```
//!
//! Priors are empirical class frequencies. Scoring accumulates
//! `ln P(c) + Σ ln P(feature_i = 1 | c)` over the features present in the
//! input vector and normalizes the class scores with log-sum-exp, so the
//! returned distribution always sums to 1. An all-zero input therefore
//! reproduces the prior distribution.

use healthinsight_core::{HealthInsightError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Default smoothing constant α.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// A fitted Naive Bayes model. Immutable after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Class labels in first-appearance order; ranking ties resolve in this
    /// order.
    classes: Vec<String>,
    /// Empirical class frequencies, parallel to `classes`.
    class_priors: Vec<f64>,
    /// `[class][feature]` log presence likelihoods.
    feature_log_likelihood: Vec<Vec<f64>>,
    /// Smoothing constant the model was fitted with.
    alpha: f64,
    /// Feature space width (V).
    n_features: usize,
}

impl NaiveBayesModel {
    /// Fit a model from an N × V binary feature matrix and N class labels.
    ///
    /// Labels may repeat across rows; classes are registered in
    /// first-appearance order. Smoothing keeps every likelihood positive,
    /// so classes do not need support for every feature.
    ///
    /// # Errors
    ///
    /// Returns a dataset error when the matrix is empty, when the row and
    /// label counts disagree, or when rows have inconsistent widths, and a
    /// configuration error when `alpha` is not positive.
    pub fn fit(matrix: &[Vec<f64>], labels: &[String], alpha: f64) -> Result<Self> {
        if alpha <= 0.0 {
            return Err(HealthInsightError::Config(format!(
                "smoothing constant must be positive, got {alpha}"
            )));
        }
        if matrix.is_empty() {
            return Err(HealthInsightError::Dataset(
                "no training examples to fit on".to_string(),
            ));
        }
        if matrix.len() != labels.len() {
            return Err(HealthInsightError::Dataset(format!(
                "feature matrix has {} rows but {} labels",
                matrix.len(),
                labels.len()
            )));
        }
        let n_features = matrix[0].len();
        for (row_idx, row) in matrix.iter().enumerate() {
            if row.len() != n_features {
                return Err(HealthInsightError::Dataset(format!(
                    "row {row_idx} has {} features, expected {n_features}",
                    row.len()
                )));
            }
        }

        let mut classes: Vec<String> = Vec::new();
        let mut class_index: HashMap<&str, usize> = HashMap::new();
        let mut rows_per_class: Vec<f64> = Vec::new();
        let mut feature_counts: Vec<Vec<f64>> = Vec::new();

        for (row, label) in matrix.iter().zip(labels) {
            let idx = *class_index.entry(label.as_str()).or_insert_with(|| {
                classes.push(label.clone());
                rows_per_class.push(0.0);
                feature_counts.push(vec![0.0_f64; n_features]);
                classes.len() - 1
            });
            rows_per_class[idx] += 1.0;
            for (count, &x) in feature_counts[idx].iter_mut().zip(row) {
                *count += x;
            }
        }

        let n_rows = matrix.len() as f64;
        let class_priors: Vec<f64> = rows_per_class.iter().map(|&rows| rows / n_rows).collect();
        let feature_log_likelihood: Vec<Vec<f64>> = feature_counts
            .iter()
            .zip(&rows_per_class)
            .map(|(counts, &rows)| {
                let denominator = rows + 2.0 * alpha;
                counts
                    .iter()
                    .map(|&count| ((count + alpha) / denominator).ln())
                    .collect()
            })
            .collect();

        debug!(
            n_rows = matrix.len(),
            n_classes = classes.len(),
            n_features,
            alpha,
            "fitted naive bayes model"
        );

        Ok(Self {
            classes,
            class_priors,
            feature_log_likelihood,
            alpha,
            n_features,
        })
    }

    /// Normalized probability distribution over all classes for a binary
    /// feature vector encoded over the training vocabulary.
    ///
    /// Deterministic: identical inputs always produce identical outputs.
    #[must_use]
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let scores: Vec<f64> = self
            .class_priors
            .iter()
            .zip(&self.feature_log_likelihood)
            .map(|(&prior, log_likelihoods)| {
                let evidence: f64 = log_likelihoods
                    .iter()
                    .zip(features)
                    .filter(|(_, &x)| x != 0.0)
                    .map(|(ll, _)| ll)
                    .sum();
                prior.ln() + evidence
            })
            .collect();

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let denominator: f64 = scores.iter().map(|&s| (s - max).exp()).sum();
        scores
            .into_iter()
            .map(|s| (s - max).exp() / denominator)
            .collect()
    }

    /// Class labels in their fixed order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of disease classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Feature space width the model was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Smoothing constant the model was fitted with.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Empirical class priors, parallel to [`Self::classes`].
    #[must_use]
    pub fn class_priors(&self) -> &[f64] {
        &self.class_priors
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
