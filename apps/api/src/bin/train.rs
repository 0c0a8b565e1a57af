//! Offline training run: fits the pipeline and atomically writes the artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use applicant_fit::pipeline::dataset::{builtin_examples, load_examples};
use applicant_fit::pipeline::forest::ForestParams;
use applicant_fit::pipeline::store::{self, DEFAULT_MODEL_PATH};
use applicant_fit::pipeline::FitPipeline;
use applicant_fit::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "train", version, about = "Train the applicant fit model")]
struct Args {
    /// JSON array of {score, coverLetter, label}; defaults to the built-in examples
    #[arg(long)]
    data: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    output: PathBuf,

    /// Random seed for bootstrap sampling and feature selection
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    trees: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing("info");

    let examples = match &args.data {
        Some(path) => load_examples(path)?,
        None => builtin_examples(),
    };
    info!("Training on {} examples", examples.len());

    let params = ForestParams {
        n_trees: args.trees,
        seed: args.seed,
        ..ForestParams::default()
    };

    let model = FitPipeline::train(&examples, &params)
        .context("Training failed; no model artifact was written")?;

    store::save(&args.output, &model)
        .with_context(|| format!("Failed to save model to {}", args.output.display()))?;

    println!("Model trained and saved to {}", args.output.display());
    Ok(())
}
