//! End-to-end training pipeline: load tables, fit, report, persist.

use crate::dataset;
use healthinsight_core::Result;
use healthinsight_model::{
    save_artifacts, ArtifactManifest, MetadataStore, NaiveBayesModel, SymptomVocabulary,
    DEFAULT_ALPHA,
};
use std::collections::HashSet;
use std::path::PathBuf;

/// Training configuration.
pub struct TrainConfig {
    /// Directory holding the four CSV tables.
    pub data_dir: PathBuf,
    /// Directory the artifact set is written to.
    pub out_dir: PathBuf,
    /// Laplace smoothing strength.
    pub alpha: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("models"),
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// What a training run produced, for the final CLI report.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub n_examples: usize,
    pub n_features: usize,
    pub n_classes: usize,
    /// Top-1 accuracy over the training rows themselves. A sanity floor,
    /// not an evaluation; the published tables are near-separable so this
    /// should sit close to 1.0.
    pub training_accuracy: f64,
    /// Vocabulary symptoms with no entry in the severity table.
    pub symptoms_without_severity: usize,
    /// Trained diseases with no entry in the description table.
    pub classes_without_description: usize,
}

/// Run the full training pipeline: load the tables, fit the model, and
/// write the artifact set.
///
/// Any table failure aborts before anything is written; the artifact
/// directory is only touched once every input has loaded cleanly.
pub fn train(config: &TrainConfig) -> Result<TrainingSummary> {
    println!("Loading tables from {}", config.data_dir.display());
    let examples = dataset::load_training_examples(&config.data_dir.join(dataset::DATASET_FILE))?;
    let descriptions = dataset::load_descriptions(&config.data_dir.join(dataset::DESCRIPTION_FILE))?;
    let precautions = dataset::load_precautions(&config.data_dir.join(dataset::PRECAUTION_FILE))?;
    let severity = dataset::load_severity(&config.data_dir.join(dataset::SEVERITY_FILE))?;

    let vocabulary = SymptomVocabulary::from_examples(&examples);
    let matrix: Vec<Vec<f64>> = examples
        .iter()
        .map(|e| vocabulary.encode(&e.symptoms))
        .collect();
    let labels: Vec<String> = examples.iter().map(|e| e.disease.clone()).collect();

    println!(
        "Data: {} rows, {} distinct symptoms, {} diseases",
        examples.len(),
        vocabulary.len(),
        labels.iter().collect::<HashSet<_>>().len()
    );

    let model = NaiveBayesModel::fit(&matrix, &labels, config.alpha)?;
    let training_accuracy = top1_accuracy(&model, &matrix, &labels);

    let symptoms_without_severity = vocabulary
        .tokens()
        .iter()
        .filter(|t| !severity.contains_key(*t))
        .count();
    let classes_without_description = model
        .classes()
        .iter()
        .filter(|c| !descriptions.contains_key(*c))
        .count();

    let metadata = MetadataStore::from_parts(descriptions, precautions, severity);
    let manifest = ArtifactManifest {
        trained_at: chrono::Utc::now().to_rfc3339(),
        n_examples: examples.len(),
        n_features: vocabulary.len(),
        n_classes: model.n_classes(),
        alpha: config.alpha,
    };

    let summary = TrainingSummary {
        n_examples: manifest.n_examples,
        n_features: manifest.n_features,
        n_classes: manifest.n_classes,
        training_accuracy,
        symptoms_without_severity,
        classes_without_description,
    };

    save_artifacts(&config.out_dir, &vocabulary, &model, &metadata, &manifest)?;
    println!("Artifacts written to {}", config.out_dir.display());

    Ok(summary)
}

/// Fraction of training rows whose top-ranked class matches their label.
fn top1_accuracy(model: &NaiveBayesModel, matrix: &[Vec<f64>], labels: &[String]) -> f64 {
    if matrix.is_empty() {
        return 0.0;
    }
    let classes = model.classes();
    let correct = matrix
        .iter()
        .zip(labels)
        .filter(|(row, label)| {
            let probabilities = model.predict_proba(row);
            probabilities
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(best, _)| &classes[best] == *label)
                .unwrap_or(false)
        })
        .count();
    correct as f64 / matrix.len() as f64
}
