//! CLI entry point for the offline fraud model trainer.
//!
//! Reads the labeled dataset, fits scaler + random forest on an
//! undersampled training partition, prints the evaluation and writes
//! `scaler.json`, `model.json` and `config.json` to the output directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fraud_core::constants::{
    DEFAULT_DATASET_PATH, DEFAULT_MODEL_DIR, DEFAULT_N_ESTIMATORS, DEFAULT_SEED, DEFAULT_TEST_SIZE,
};
use fraud_core::logic::model::ForestParams;
use fraud_core::logic::training::{self, TrainConfig};

#[derive(Parser)]
#[command(name = "fraud-train", about = "Train the credit card fraud classifier")]
struct Cli {
    /// Path to the labeled CSV dataset.
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Directory the three artifacts are written to.
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    output_dir: PathBuf,

    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Random seed for split, undersampling and trees.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of trees in the forest.
    #[arg(long, default_value_t = DEFAULT_N_ESTIMATORS)]
    n_estimators: usize,

    /// Maximum tree depth (unlimited when omitted).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum samples per leaf.
    #[arg(long, default_value_t = 1)]
    min_samples_leaf: usize,
}

impl Cli {
    fn into_config(self) -> TrainConfig {
        TrainConfig {
            dataset_path: self.dataset,
            output_dir: self.output_dir,
            test_size: self.test_size,
            seed: self.seed,
            forest: ForestParams {
                n_estimators: self.n_estimators,
                max_depth: self.max_depth,
                min_samples_leaf: self.min_samples_leaf,
                seed: self.seed,
                ..ForestParams::default()
            },
            ..TrainConfig::default()
        }
    }
}

fn run(config: &TrainConfig) -> anyhow::Result<()> {
    let trained = training::run(config)
        .with_context(|| format!("training on {} failed", config.dataset_path.display()))?;

    let report = &trained.report;
    println!("Classification Report:\n{}", report.classification);
    match report.roc_auc {
        Some(auc) => println!("ROC-AUC: {:.4}", auc),
        None => println!("ROC-AUC: undefined (test partition has a single class)"),
    }

    log::info!(
        "Model and scaler saved successfully to {}",
        config.output_dir.display()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();

    if let Err(e) = run(&config) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
