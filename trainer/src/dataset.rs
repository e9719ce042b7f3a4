//! CSV table loading for the offline trainer.
//!
//! Four tables feed training, with the column layout fixed by the published
//! dataset:
//!
//! | File | Columns | Feeds |
//! |------|---------|-------|
//! | `dataset.csv` | `Disease`, `Symptom_1..Symptom_17` | training examples |
//! | `symptom_Description.csv` | `Disease`, `Description` | disease descriptions |
//! | `symptom_precaution.csv` | `Disease`, `Precaution_1..` | disease advice lists |
//! | `Symptom-severity.csv` | `Symptom`, `weight` | symptom severity table |
//!
//! The raw tables are messy: cells carry stray whitespace and most rows leave
//! trailing symptom columns blank. All loaders trim every cell and drop blank
//! ones, so downstream token matching sees clean identifiers only. An empty
//! or structurally broken table is fatal; the trainer must not write a
//! partial artifact set from bad input.

use healthinsight_core::{HealthInsightError, Result, TrainingExample};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Symptom rows: one disease label plus up to 17 symptom columns.
pub const DATASET_FILE: &str = "dataset.csv";
/// One description per disease.
pub const DESCRIPTION_FILE: &str = "symptom_Description.csv";
/// Up to four precaution phrases per disease.
pub const PRECAUTION_FILE: &str = "symptom_precaution.csv";
/// Severity weight per symptom (1 = mild, 7 = critical).
pub const SEVERITY_FILE: &str = "Symptom-severity.csv";

/// Conventional data directory locations, probed in order.
const DATA_DIR_CANDIDATES: &[&str] = &["data", "src/data"];

/// Locate the data directory under `base`.
///
/// Probes the conventional locations and falls back to `base` itself when
/// no dedicated data directory exists.
pub fn resolve_data_dir(base: &Path) -> PathBuf {
    DATA_DIR_CANDIDATES
        .iter()
        .map(|c| base.join(c))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| base.to_path_buf())
}

/// Load the symptom table into training examples.
///
/// The disease label comes from the `Disease` column; every column whose
/// header starts with `Symptom` contributes one (possibly blank) symptom
/// cell.
///
/// # Errors
///
/// Returns [`HealthInsightError::Dataset`] if the file cannot be read, the
/// `Disease` column or all `Symptom` columns are missing, or no usable rows
/// remain after cleaning.
pub fn load_training_examples(path: &Path) -> Result<Vec<TrainingExample>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;

    let disease_col = column_index(&headers, "Disease", path)?;
    let symptom_cols: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.trim().starts_with("Symptom"))
        .map(|(i, _)| i)
        .collect();
    if symptom_cols.is_empty() {
        return Err(HealthInsightError::Dataset(format!(
            "{}: no `Symptom` columns in header",
            path.display()
        )));
    }

    let mut examples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| row_error(path, row, &e))?;
        let disease = record.get(disease_col).unwrap_or("").trim();
        if disease.is_empty() {
            warn!(row = row + 2, "skipping row with blank disease cell");
            continue;
        }
        let symptoms: Vec<String> = symptom_cols
            .iter()
            .filter_map(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        examples.push(TrainingExample::new(disease.to_string(), symptoms));
    }

    if examples.is_empty() {
        return Err(HealthInsightError::Dataset(format!(
            "{}: no usable training rows",
            path.display()
        )));
    }
    Ok(examples)
}

/// Load the disease description table.
///
/// Duplicate disease rows follow last-write-wins, matching how the maps are
/// merged everywhere else.
pub fn load_descriptions(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let disease_col = column_index(&headers, "Disease", path)?;
    let description_col = column_index(&headers, "Description", path)?;

    let mut map = HashMap::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| row_error(path, row, &e))?;
        let disease = record.get(disease_col).unwrap_or("").trim();
        if disease.is_empty() {
            continue;
        }
        let description = record.get(description_col).unwrap_or("").trim();
        map.insert(disease.to_string(), description.to_string());
    }

    if map.is_empty() {
        return Err(HealthInsightError::Dataset(format!(
            "{}: no description rows",
            path.display()
        )));
    }
    Ok(map)
}

/// Load the precaution table.
///
/// Every non-`Disease` column is a precaution slot; blank slots are dropped
/// so diseases keep only the phrases the table actually provides.
pub fn load_precautions(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let disease_col = column_index(&headers, "Disease", path)?;

    let mut map = HashMap::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| row_error(path, row, &e))?;
        let disease = record.get(disease_col).unwrap_or("").trim();
        if disease.is_empty() {
            continue;
        }
        let precautions: Vec<String> = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != disease_col)
            .map(|(_, cell)| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect();
        map.insert(disease.to_string(), precautions);
    }

    if map.is_empty() {
        return Err(HealthInsightError::Dataset(format!(
            "{}: no precaution rows",
            path.display()
        )));
    }
    Ok(map)
}

/// Load the symptom severity table.
///
/// # Errors
///
/// A weight that does not parse as an unsigned integer is fatal; a silently
/// defaulted weight would skew every focus note built from it.
pub fn load_severity(path: &Path) -> Result<HashMap<String, u32>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let symptom_col = column_index(&headers, "Symptom", path)?;
    let weight_col = column_index(&headers, "weight", path)?;

    let mut map = HashMap::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| row_error(path, row, &e))?;
        let symptom = record.get(symptom_col).unwrap_or("").trim();
        if symptom.is_empty() {
            continue;
        }
        let raw = record.get(weight_col).unwrap_or("").trim();
        let weight: u32 = raw.parse().map_err(|_| {
            HealthInsightError::Dataset(format!(
                "{} row {}: invalid weight {:?} for symptom {:?}",
                path.display(),
                row + 2,
                raw,
                symptom
            ))
        })?;
        map.insert(symptom.to_string(), weight);
    }

    if map.is_empty() {
        return Err(HealthInsightError::Dataset(format!(
            "{}: no severity rows",
            path.display()
        )));
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Shared CSV plumbing
// ---------------------------------------------------------------------------

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    // flexible: the published tables have ragged rows in places.
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| HealthInsightError::Dataset(format!("open {}: {e}", path.display())))
}

fn read_headers(
    reader: &mut csv::Reader<std::fs::File>,
    path: &Path,
) -> Result<csv::StringRecord> {
    reader
        .headers()
        .map(Clone::clone)
        .map_err(|e| HealthInsightError::Dataset(format!("read header of {}: {e}", path.display())))
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| {
            HealthInsightError::Dataset(format!(
                "{}: missing `{name}` column",
                path.display()
            ))
        })
}

fn row_error(path: &Path, row: usize, e: &csv::Error) -> HealthInsightError {
    // Header is line 1, first record line 2.
    HealthInsightError::Dataset(format!("{} row {}: {e}", path.display(), row + 2))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
