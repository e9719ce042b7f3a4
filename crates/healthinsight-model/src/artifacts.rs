//! Artifact persistence for trained models.
//!
//! A training run produces one artifact directory:
//!
//! | File                  | Content                                  |
//! |-----------------------|------------------------------------------|
//! | `model.json`          | the fitted [`NaiveBayesModel`]           |
//! | `features.json`       | ordered vocabulary token list            |
//! | `description.json`    | disease → description map                |
//! | `precautions.json`    | disease → precaution list map            |
//! | `symptom_weight.json` | symptom → severity weight map            |
//! | `manifest.json`       | training provenance (never read by the engine) |
//!
//! The whole set is serialized to temp files in the target directory
//! before anything is renamed into place; a run that fails while encoding
//! leaves a previous artifact set untouched. Publishing then removes the
//! old model file before the renames and lands the new one last, so at
//! any instant the directory holds the old set, the new set, or nothing
//! loadable. It never loads a mix of two runs.

use crate::analyzer::SymptomAnalyzer;
use crate::classifier::NaiveBayesModel;
use crate::metadata::MetadataStore;
use crate::vocabulary::SymptomVocabulary;
use healthinsight_core::{HealthInsightError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Fitted classifier artifact.
pub const MODEL_FILE: &str = "model.json";
/// Ordered vocabulary artifact.
pub const FEATURES_FILE: &str = "features.json";
/// Disease description map artifact.
pub const DESCRIPTION_FILE: &str = "description.json";
/// Disease precaution map artifact.
pub const PRECAUTIONS_FILE: &str = "precautions.json";
/// Symptom severity weight map artifact.
pub const SYMPTOM_WEIGHT_FILE: &str = "symptom_weight.json";
/// Training provenance manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Provenance written alongside the model after a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// RFC 3339 timestamp of the training run.
    pub trained_at: String,
    /// Number of training rows the model was fitted on.
    pub n_examples: usize,
    /// Feature space width.
    pub n_features: usize,
    /// Number of disease classes.
    pub n_classes: usize,
    /// Smoothing constant used.
    pub alpha: f64,
}

/// Write a full artifact set into `dir`, creating it if needed.
///
/// The set is staged in full before anything is renamed into place, so
/// re-training into a populated directory cannot leave a loadable mix of
/// old and new files.
///
/// # Errors
///
/// Returns an artifact error when the directory or a temp file cannot be
/// created or renamed, and a serialization error when encoding fails.
pub fn save_artifacts(
    dir: &Path,
    vocabulary: &SymptomVocabulary,
    model: &NaiveBayesModel,
    metadata: &MetadataStore,
    manifest: &ArtifactManifest,
) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        HealthInsightError::Artifact(format!("create artifact dir {}: {e}", dir.display()))
    })?;

    // Stage everything first; a failure here leaves any previous set
    // untouched on disk.
    let staged = [
        (FEATURES_FILE, stage_json(dir, FEATURES_FILE, vocabulary.tokens())?),
        (DESCRIPTION_FILE, stage_json(dir, DESCRIPTION_FILE, metadata.descriptions())?),
        (PRECAUTIONS_FILE, stage_json(dir, PRECAUTIONS_FILE, metadata.precautions())?),
        (SYMPTOM_WEIGHT_FILE, stage_json(dir, SYMPTOM_WEIGHT_FILE, metadata.symptom_weights())?),
        (MANIFEST_FILE, stage_json(dir, MANIFEST_FILE, manifest)?),
        (MODEL_FILE, stage_json(dir, MODEL_FILE, model)?),
    ];

    // Remove the old model before the renames; between here and the final
    // persist the directory does not load, so a crash mid-publish cannot
    // pair fresh files with a stale model.
    let model_path = dir.join(MODEL_FILE);
    if let Err(e) = fs::remove_file(&model_path) {
        if e.kind() != ErrorKind::NotFound {
            return Err(HealthInsightError::Artifact(format!(
                "remove stale {}: {e}",
                model_path.display()
            )));
        }
    }

    // The model file lands last.
    for (name, temp) in staged {
        let path = dir.join(name);
        temp.persist(&path).map_err(|e| {
            HealthInsightError::Artifact(format!("persist {}: {e}", path.display()))
        })?;
    }

    info!(dir = %dir.display(), "model artifacts written");
    Ok(())
}

/// Load a full artifact set from `dir` and assemble the inference engine.
///
/// # Errors
///
/// Returns an artifact error when a file is missing or malformed, or when
/// the vocabulary and model dimensions disagree.
pub fn load_artifacts(dir: &Path) -> Result<SymptomAnalyzer> {
    let model: NaiveBayesModel = read_json(dir, MODEL_FILE)?;
    let tokens: Vec<String> = read_json(dir, FEATURES_FILE)?;
    let descriptions: HashMap<String, String> = read_json(dir, DESCRIPTION_FILE)?;
    let precautions: HashMap<String, Vec<String>> = read_json(dir, PRECAUTIONS_FILE)?;
    let symptom_weights: HashMap<String, u32> = read_json(dir, SYMPTOM_WEIGHT_FILE)?;

    let vocabulary = SymptomVocabulary::new(tokens);
    let metadata = MetadataStore::from_parts(descriptions, precautions, symptom_weights);
    let analyzer = SymptomAnalyzer::new(vocabulary, model, metadata)?;

    info!(
        dir = %dir.display(),
        n_features = analyzer.vocabulary().len(),
        n_classes = analyzer.model().n_classes(),
        "model artifacts loaded"
    );
    Ok(analyzer)
}

/// Load the provenance manifest, if the directory carries one.
///
/// # Errors
///
/// Returns an artifact error when the manifest is missing or malformed.
pub fn load_manifest(dir: &Path) -> Result<ArtifactManifest> {
    read_json(dir, MANIFEST_FILE)
}

/// Serialize `value` into an unnamed temp file beside its eventual target.
/// The caller renames it into place once the whole set has staged.
fn stage_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<NamedTempFile> {
    let temp = NamedTempFile::new_in(dir).map_err(|e| {
        HealthInsightError::Artifact(format!("create temp file in {}: {e}", dir.display()))
    })?;
    let mut writer = BufWriter::new(&temp);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| {
        HealthInsightError::Artifact(format!("write {}: {e}", dir.join(name).display()))
    })?;
    drop(writer);
    Ok(temp)
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    let contents = fs::read_to_string(&path).map_err(|e| {
        HealthInsightError::Artifact(format!("read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        HealthInsightError::Artifact(format!("parse {}: {e}", path.display()))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
