//! Symptom-to-disease inference engine for HealthInsight.
//!
//! This crate holds everything between raw training rows and a served
//! prediction: the frozen symptom vocabulary and its multi-label binarizer,
//! the typed Naive Bayes classifier, the disease/symptom metadata tables,
//! the [`SymptomAnalyzer`] inference pipeline, and JSON artifact
//! persistence for moving a trained model from the trainer to the server.

pub mod analyzer;
pub mod artifacts;
pub mod classifier;
pub mod metadata;
pub mod vocabulary;

// Re-export key types for convenience
pub use analyzer::SymptomAnalyzer;
pub use artifacts::{load_artifacts, load_manifest, save_artifacts, ArtifactManifest};
pub use classifier::{NaiveBayesModel, DEFAULT_ALPHA};
pub use metadata::MetadataStore;
pub use vocabulary::SymptomVocabulary;
