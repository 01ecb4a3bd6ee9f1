//! Predict next-day sales with a trained model
//!
//! Usage:
//! ```bash
//! cargo run --release --bin predict -- --model-dir runs/latest --input data/eval.csv
//! ```

use anyhow::{Context, Result};
use burn::backend::NdArray;
use clap::Parser;
use sales_forecast::{
    invert_scale_sales, load_features,
    model::{mean_absolute_error, predict_windows},
    setup_logging, ArtifactPaths, Config, MinMaxScaler, SalesCnn,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

type Backend = NdArray<f32>;

#[derive(Parser)]
#[command(name = "predict")]
#[command(about = "Predict next-day sales with a trained CNN", long_about = None)]
struct Args {
    /// Directory written by `train`
    #[arg(short, long)]
    model_dir: PathBuf,

    /// CSV file to predict on
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PredictionRow {
    predicted: f32,
    actual: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = ArtifactPaths::new(&args.model_dir);

    let config = Config::load(paths.config())
        .with_context(|| format!("failed to load {}", paths.config().display()))?;
    setup_logging(&config.logging.level)?;
    config.validate().context("invalid configuration")?;

    let scaler = MinMaxScaler::load(paths.scaler())
        .with_context(|| format!("failed to load {}", paths.scaler().display()))?;
    let pipeline = config.data.pipeline_config()?;

    let (x, y) = load_features(&[&args.input], &scaler, &pipeline)?;
    if x.is_empty() {
        anyhow::bail!(
            "{} has too few rows for a look-back of {}",
            args.input.display(),
            pipeline.look_back
        );
    }
    info!("Predicting {} windows from {}", x.len_of(ndarray::Axis(0)), args.input.display());

    let device = Default::default();
    let model = SalesCnn::<Backend>::load(&config.model, paths.model(), &device)
        .context("failed to load model weights")?;

    let predictions = predict_windows(&model, &x, &device)?;
    let predicted = invert_scale_sales(&predictions, &scaler);
    let actual = invert_scale_sales(&y, &scaler);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    for (&predicted, &actual) in predicted.iter().zip(actual.iter()) {
        writer.serialize(PredictionRow { predicted, actual })?;
    }
    writer.flush()?;

    info!("MAE (sales): {:.2}", mean_absolute_error(&predicted, &actual));

    Ok(())
}
