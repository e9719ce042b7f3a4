//! Disease and symptom metadata lookups.
//!
//! Three independent maps built from the auxiliary tables: disease →
//! description, disease → precaution list, and symptom → severity weight.
//! Lookups never fail; a missing key degrades to an empty value or zero
//! weight so a prediction can always be annotated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata tables keyed by disease or symptom name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataStore {
    descriptions: HashMap<String, String>,
    precautions: HashMap<String, Vec<String>>,
    symptom_weights: HashMap<String, u32>,
}

impl MetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously persisted maps.
    #[must_use]
    pub fn from_parts(
        descriptions: HashMap<String, String>,
        precautions: HashMap<String, Vec<String>>,
        symptom_weights: HashMap<String, u32>,
    ) -> Self {
        Self {
            descriptions,
            precautions,
            symptom_weights,
        }
    }

    /// Record the description for a disease.
    ///
    /// Last write wins when the same disease appears more than once in the
    /// source table.
    pub fn set_description(&mut self, disease: String, description: String) {
        self.descriptions.insert(disease, description);
    }

    /// Record the precaution list for a disease. Last write wins.
    pub fn set_precautions(&mut self, disease: String, advice: Vec<String>) {
        self.precautions.insert(disease, advice);
    }

    /// Record the severity weight for a symptom. Last write wins.
    pub fn set_symptom_weight(&mut self, symptom: String, weight: u32) {
        self.symptom_weights.insert(symptom, weight);
    }

    /// Description for a disease, or an empty string when none is known.
    #[must_use]
    pub fn description_for(&self, disease: &str) -> String {
        self.descriptions.get(disease).cloned().unwrap_or_default()
    }

    /// Precautions for a disease, or an empty list when none are known.
    #[must_use]
    pub fn precautions_for(&self, disease: &str) -> Vec<String> {
        self.precautions.get(disease).cloned().unwrap_or_default()
    }

    /// Severity weight for a symptom, or 0 when the symptom is not in the
    /// table.
    #[must_use]
    pub fn weight_for(&self, symptom: &str) -> u32 {
        self.symptom_weights.get(symptom).copied().unwrap_or(0)
    }

    /// The full description map.
    #[must_use]
    pub fn descriptions(&self) -> &HashMap<String, String> {
        &self.descriptions
    }

    /// The full precaution map.
    #[must_use]
    pub fn precautions(&self) -> &HashMap<String, Vec<String>> {
        &self.precautions
    }

    /// The full symptom weight map.
    #[must_use]
    pub fn symptom_weights(&self) -> &HashMap<String, u32> {
        &self.symptom_weights
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
