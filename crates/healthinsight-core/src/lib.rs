//! Core types, payloads, and errors for HealthInsight
//!
//! This crate contains the foundational types shared across all HealthInsight
//! components: the severity tiers derived from predicted probabilities and
//! symptom weights, the request/response payloads of the prediction service,
//! the server configuration structures, and the workspace error type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Severity tiers
// ---------------------------------------------------------------------------

/// Probability at or above which a candidate disease is flagged `high`.
pub const HIGH_PROBABILITY_CUTOFF: f64 = 0.6;
/// Probability at or above which a candidate disease is flagged `medium`.
pub const MEDIUM_PROBABILITY_CUTOFF: f64 = 0.3;

/// Warning level attached to a ranked disease candidate, derived from its
/// predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    /// Probability below 0.3.
    Low,
    /// Probability in [0.3, 0.6).
    Medium,
    /// Probability of 0.6 or higher.
    High,
}

impl WarningLevel {
    /// Discretize a predicted probability into a warning level.
    ///
    /// Boundaries are inclusive at the lower end of each tier: exactly 0.6
    /// is `High` and exactly 0.3 is `Medium`.
    #[must_use]
    pub fn from_probability(p: f64) -> Self {
        if p >= HIGH_PROBABILITY_CUTOFF {
            Self::High
        } else if p >= MEDIUM_PROBABILITY_CUTOFF {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for WarningLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown warning level: {s}")),
        }
    }
}

/// Symptom weight at or above which a symptom is considered severe.
pub const SEVERE_WEIGHT_CUTOFF: u32 = 7;
/// Symptom weight at or above which a symptom is considered moderate.
pub const MODERATE_WEIGHT_CUTOFF: u32 = 4;

/// Severity band for a single reported symptom, derived from its static
/// weight in the severity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    /// Weight below 4.
    Mild,
    /// Weight in [4, 7).
    Moderate,
    /// Weight of 7 or higher.
    Severe,
}

impl SeverityBand {
    /// Discretize a symptom weight into a severity band.
    #[must_use]
    pub fn from_weight(weight: u32) -> Self {
        if weight >= SEVERE_WEIGHT_CUTOFF {
            Self::Severe
        } else if weight >= MODERATE_WEIGHT_CUTOFF {
            Self::Moderate
        } else {
            Self::Mild
        }
    }

    /// Human-readable guidance note for this band, as emitted in the
    /// symptom-focus section of a prediction.
    #[must_use]
    pub fn note(self) -> &'static str {
        match self {
            Self::Severe => "severe, requires attention",
            Self::Moderate => "moderate, monitor",
            Self::Mild => "mild, monitor at home",
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mild => write!(f, "mild"),
            Self::Moderate => write!(f, "moderate"),
            Self::Severe => write!(f, "severe"),
        }
    }
}

/// Round a probability to two decimal places for presentation.
///
/// Ranking always happens on unrounded values; only the emitted
/// `match_score` goes through this.
#[must_use]
pub fn round_score(p: f64) -> f64 {
    (p * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Training data types
// ---------------------------------------------------------------------------

/// One disease case from the training table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Disease label for this case.
    pub disease: String,
    /// Symptoms reported for this case. Variable length; duplicates and an
    /// empty list are allowed.
    pub symptoms: Vec<String>,
}

impl TrainingExample {
    /// Create a training example.
    pub fn new(disease: String, symptoms: Vec<String>) -> Self {
        Self { disease, symptoms }
    }
}

// ---------------------------------------------------------------------------
// Prediction payloads
// ---------------------------------------------------------------------------

/// Default number of ranked candidates returned when the caller does not
/// specify `topK`.
pub const DEFAULT_TOP_K: usize = 5;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Body of a prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Symptoms reported by the caller. May be empty, contain duplicates,
    /// or contain tokens unknown to the model.
    pub symptoms: Vec<String>,
    /// Number of ranked candidates to return. `None` falls back to the
    /// server's configured default; zero yields an empty `analysis`; values
    /// above the class count are truncated.
    #[serde(rename = "topK", default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl PredictRequest {
    /// Create a request for the given symptoms, leaving top-K to the
    /// server default.
    pub fn new(symptoms: Vec<String>) -> Self {
        Self {
            symptoms,
            top_k: None,
        }
    }

    /// Override the number of candidates to return.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// One ranked disease candidate in a prediction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseAnalysis {
    /// Disease name as it appears in the model's class list.
    pub topic: String,
    /// Related condition identifier; currently mirrors `topic`.
    pub related: String,
    /// Predicted probability rounded to two decimals (presentation only).
    pub match_score: f64,
    /// Disease description, or empty when no metadata exists.
    pub description: String,
    /// Precautionary advice, or empty when no metadata exists.
    pub advice: Vec<String>,
    /// Warning tier derived from the unrounded probability.
    pub warning_level: WarningLevel,
}

/// Per-input-symptom annotation, independent of the disease ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomFocus {
    /// The symptom exactly as the caller sent it.
    pub symptom: String,
    /// Static severity weight, 0 when the symptom is not in the table.
    pub weight: u32,
    /// Guidance note derived from the weight.
    pub note: String,
}

/// Full prediction response: ranked candidates plus per-symptom focus notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Ranked disease candidates, highest probability first.
    pub analysis: Vec<DiseaseAnalysis>,
    /// One entry per input symptom, in input order.
    pub symptom_focus: Vec<SymptomFocus>,
}

/// Read-only view of the model's feature space and severity table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCatalog {
    /// Vocabulary tokens in their frozen index order.
    pub features: Vec<String>,
    /// Symptom token to severity weight.
    pub symptom_meta: HashMap<String, u32>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Top-level server configuration, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Directory containing the trained model artifacts.
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
    /// Default top-K applied when a request omits `topK`.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_model_dir() -> String {
    "models".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            model_dir: default_model_dir(),
            default_top_k: DEFAULT_TOP_K,
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// CORS configuration section within [`ServerConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allow any origin, method, and header. The service is meant to sit
    /// behind a browser frontend on a different origin.
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: `text` (human-readable) or `json` (structured).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Core error types.
#[derive(thiserror::Error, Debug)]
pub enum HealthInsightError {
    /// Training data is missing, empty, or missing required columns.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// A model artifact is missing, malformed, or inconsistent.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Serialization / deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for `std::result::Result<T, HealthInsightError>`.
pub type Result<T> = std::result::Result<T, HealthInsightError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
