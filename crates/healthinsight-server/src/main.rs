//! HealthInsight Prediction Server
//!
//! An HTTP service that maps self-reported symptoms to ranked disease
//! candidates using a trained Naive Bayes model. Serves `/health`,
//! `/api/model/features`, and `/api/model/predict`; artifacts are loaded
//! once at startup and shared immutably across requests.

mod config;
mod routes;
mod shutdown;

use crate::routes::{build_router, AppState};
use anyhow::Context;
use healthinsight_core::{LoggingConfig, ServerConfig};
use healthinsight_model::{load_artifacts, load_manifest};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Resolve configuration before logging so the subscriber honours the
    // configured level and format.
    let (config, config_path) = load_server_config()?;

    init_logging(&config.logging);

    match &config_path {
        Some(path) => info!(path = %path.display(), "Loaded configuration from file"),
        None => info!("No config file specified, using defaults"),
    }

    info!(
        listen_addr = %config.listen_addr,
        model_dir = %config.model_dir,
        "Starting HealthInsight prediction server"
    );

    let listen_addr = config.listen_addr.clone();

    // Build shared application state
    let state = build_app_state(config)?;

    // Build the axum router
    let app = build_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "Prediction server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    Ok(())
}

/// Load server configuration from a YAML file or fall back to defaults.
///
/// Checks (in order):
/// 1. First CLI argument as config path
/// 2. `HEALTHINSIGHT_CONFIG` environment variable
/// 3. Default configuration
///
/// Returns the resolved path alongside the config so startup can report
/// where the settings came from once logging is up.
fn load_server_config() -> anyhow::Result<(ServerConfig, Option<PathBuf>)> {
    let config_path: Option<PathBuf> = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HEALTHINSIGHT_CONFIG").ok())
        .map(PathBuf::from);

    match config_path {
        Some(path) => {
            let config = config::load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((ServerConfig::default(), None)),
    }
}

/// Initialize the tracing subscriber from the logging configuration.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    if config.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build the shared [`AppState`] from the server configuration.
///
/// Loads the trained artifacts from `model_dir`; a missing or inconsistent
/// artifact set is fatal.
fn build_app_state(config: ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let model_dir = PathBuf::from(&config.model_dir);

    let analyzer = load_artifacts(&model_dir).with_context(|| {
        format!(
            "failed to load model artifacts from {}",
            model_dir.display()
        )
    })?;

    match load_manifest(&model_dir) {
        Ok(manifest) => info!(
            trained_at = %manifest.trained_at,
            n_examples = manifest.n_examples,
            n_classes = manifest.n_classes,
            n_features = manifest.n_features,
            "Model artifacts loaded"
        ),
        Err(e) => warn!(error = %e, "Model loaded but manifest is unreadable"),
    }

    Ok(Arc::new(AppState { analyzer, config }))
}
