//! Trainer binary for the HealthInsight prediction service.
//!
//! Reads the four CSV tables, fits the Naive Bayes model, and writes the
//! artifact set the server loads at startup. Exits with code 1 on any
//! failure; a failed run leaves no partial artifacts behind.
//!
//! Usage:
//!   cargo run --bin healthinsight-trainer
//!   cargo run --bin healthinsight-trainer -- --data-dir data --out-dir models
//!   cargo run --bin healthinsight-trainer -- --alpha 0.5

use clap::Parser;
use healthinsight_model::DEFAULT_ALPHA;
use healthinsight_trainer::dataset;
use healthinsight_trainer::{train, TrainConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "healthinsight-trainer",
    about = "Train the HealthInsight symptom model from CSV tables"
)]
struct Cli {
    /// Directory holding the CSV tables. Omit to probe data/, src/data/,
    /// then the working directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory to write model artifacts.
    #[arg(long, default_value = "models")]
    out_dir: PathBuf,

    /// Laplace smoothing strength (must be positive).
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    alpha: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = TrainConfig {
        data_dir: cli
            .data_dir
            .unwrap_or_else(|| dataset::resolve_data_dir(Path::new("."))),
        out_dir: cli.out_dir,
        alpha: cli.alpha,
    };

    println!("{}", "=".repeat(60));
    println!("  HealthInsight model training");
    println!("{}", "=".repeat(60));

    match train(&config) {
        Ok(summary) => {
            println!(
                "Trained {} classes over {} features from {} rows",
                summary.n_classes, summary.n_features, summary.n_examples
            );
            println!(
                "Training-set top-1 accuracy: {:.1}%",
                summary.training_accuracy * 100.0
            );
            if summary.symptoms_without_severity > 0 {
                println!(
                    "Warning: {} vocabulary symptoms have no severity entry (focus weight 0)",
                    summary.symptoms_without_severity
                );
            }
            if summary.classes_without_description > 0 {
                println!(
                    "Warning: {} diseases have no description entry",
                    summary.classes_without_description
                );
            }
        }
        Err(e) => {
            eprintln!("Training failed: {e}");
            std::process::exit(1);
        }
    }
}
