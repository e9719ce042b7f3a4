//! Offline training for the HealthInsight prediction service.
//!
//! Turns the four published CSV tables into the artifact set the server
//! loads at startup: a fitted Naive Bayes model, the frozen symptom
//! vocabulary, and the disease/symptom metadata maps.

pub mod dataset;
pub mod pipeline;

pub use pipeline::{train, TrainConfig, TrainingSummary};
