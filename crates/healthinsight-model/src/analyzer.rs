//! The symptom-to-disease inference engine.
//!
//! [`SymptomAnalyzer`] bundles the frozen vocabulary, the fitted classifier,
//! and the metadata tables into one immutable engine. Construction happens
//! once (from a training run or from persisted artifacts); after that every
//! prediction is a pure function of the engine and the request, so the
//! engine can be shared across request handlers without locking.
//!
//! A prediction runs encode → score → rank → truncate → annotate, then adds
//! the per-input-symptom focus notes.

use crate::classifier::NaiveBayesModel;
use crate::metadata::MetadataStore;
use crate::vocabulary::SymptomVocabulary;
use healthinsight_core::{
    round_score, DiseaseAnalysis, FeatureCatalog, HealthInsightError, PredictionReport, Result,
    SeverityBand, SymptomFocus, WarningLevel,
};
use tracing::debug;

/// Immutable inference engine over a trained model.
#[derive(Debug, Clone)]
pub struct SymptomAnalyzer {
    vocabulary: SymptomVocabulary,
    model: NaiveBayesModel,
    metadata: MetadataStore,
}

impl SymptomAnalyzer {
    /// Assemble an engine from its trained parts.
    ///
    /// # Errors
    ///
    /// Returns an artifact error when the vocabulary size does not match
    /// the model's feature dimension.
    pub fn new(
        vocabulary: SymptomVocabulary,
        model: NaiveBayesModel,
        metadata: MetadataStore,
    ) -> Result<Self> {
        if vocabulary.len() != model.n_features() {
            return Err(HealthInsightError::Artifact(format!(
                "vocabulary has {} tokens but the model was fitted on {} features",
                vocabulary.len(),
                model.n_features()
            )));
        }
        Ok(Self {
            vocabulary,
            model,
            metadata,
        })
    }

    /// Read-only view of the feature space and severity table.
    #[must_use]
    pub fn features(&self) -> FeatureCatalog {
        FeatureCatalog {
            features: self.vocabulary.tokens().to_vec(),
            symptom_meta: self.metadata.symptom_weights().clone(),
        }
    }

    /// Rank disease candidates for the given symptoms.
    ///
    /// Unknown symptoms are ignored for scoring but still echoed in the
    /// symptom-focus section; duplicates collapse to a single presence bit.
    /// The analysis contains `min(top_k, n_classes)` entries sorted by
    /// descending probability, ties resolving in class order.
    #[must_use]
    pub fn predict(&self, symptoms: &[String], top_k: usize) -> PredictionReport {
        let unknown: Vec<&str> = symptoms
            .iter()
            .filter(|s| self.vocabulary.index_of(s).is_none())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            debug!(?unknown, "symptoms not in vocabulary, ignored for scoring");
        }

        let vector = self.vocabulary.encode(symptoms);
        let probabilities = self.model.predict_proba(&vector);

        // Stable sort keeps class order for exactly equal probabilities.
        let mut ranked: Vec<usize> = (0..probabilities.len()).collect();
        ranked.sort_by(|&a, &b| {
            probabilities[b]
                .partial_cmp(&probabilities[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let take = top_k.min(self.model.n_classes());
        let analysis: Vec<DiseaseAnalysis> = ranked
            .into_iter()
            .take(take)
            .map(|idx| {
                let topic = self.model.classes()[idx].clone();
                let p = probabilities[idx];
                DiseaseAnalysis {
                    related: topic.clone(),
                    match_score: round_score(p),
                    description: self.metadata.description_for(&topic),
                    advice: self.metadata.precautions_for(&topic),
                    warning_level: WarningLevel::from_probability(p),
                    topic,
                }
            })
            .collect();

        let symptom_focus: Vec<SymptomFocus> = symptoms
            .iter()
            .map(|symptom| {
                let weight = self.metadata.weight_for(symptom);
                SymptomFocus {
                    symptom: symptom.clone(),
                    weight,
                    note: SeverityBand::from_weight(weight).note().to_string(),
                }
            })
            .collect();

        PredictionReport {
            analysis,
            symptom_focus,
        }
    }

    /// The frozen vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    /// The fitted classifier.
    #[must_use]
    pub fn model(&self) -> &NaiveBayesModel {
        &self.model
    }

    /// The metadata tables.
    #[must_use]
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
