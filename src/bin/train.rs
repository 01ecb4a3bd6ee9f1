//! Train the next-day sales CNN
//!
//! Usage:
//! ```bash
//! cargo run --release --bin train -- \
//!     --train-files data/train.csv --eval-files data/eval.csv --output-dir runs/latest
//! ```

use anyhow::{Context, Result};
use burn::backend::{Autodiff, NdArray};
use clap::Parser;
use sales_forecast::{
    build_scaler, invert_scale_sales, load_features, model::mean_absolute_error, model_fn,
    setup_logging, ArtifactPaths, Config,
};
use std::path::PathBuf;
use tracing::info;

type Backend = Autodiff<NdArray<f32>>;

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train the next-day sales CNN", long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training CSV files
    #[arg(long, num_args = 1.., required = true)]
    train_files: Vec<PathBuf>,

    /// Evaluation CSV files
    #[arg(long, num_args = 1..)]
    eval_files: Vec<PathBuf>,

    /// Directory for the model, scaler and config
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Override the configured number of epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Override the configured batch size
    #[arg(long)]
    batch_size: Option<usize>,

    /// Override the configured learning rate
    #[arg(long)]
    learning_rate: Option<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(epochs) = args.epochs {
        config.training.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        config.training.batch_size = batch_size;
    }
    if let Some(learning_rate) = args.learning_rate {
        config.compile.learning_rate = learning_rate;
    }

    setup_logging(&config.logging.level)?;
    config.validate().context("invalid configuration")?;

    let schema = config.data.schema()?;
    let loader = config.data.loader_options()?;
    let pipeline = config.data.pipeline_config()?;

    // Scaler statistics cover every file the model will see
    let scaler_files: Vec<PathBuf> = args
        .train_files
        .iter()
        .chain(args.eval_files.iter())
        .cloned()
        .collect();
    let scaler = build_scaler(&scaler_files, &schema, &loader).context("failed to fit scaler")?;

    let (x_train, y_train) =
        load_features(&args.train_files, &scaler, &pipeline).context("failed to load training data")?;
    info!("Training windows: {:?}", x_train.shape());

    let device = Default::default();
    let mut model = model_fn::<Backend>(&config.model, &config.compile, &device)?;
    let history = model.fit(&x_train, &y_train, &config.training)?;

    if !args.eval_files.is_empty() {
        let (x_eval, y_eval) = load_features(&args.eval_files, &scaler, &pipeline)
            .context("failed to load evaluation data")?;
        let metrics = model.evaluate(&x_eval, &y_eval)?;
        let predictions = model.predict(&x_eval)?;
        let sales_mae = mean_absolute_error(
            &invert_scale_sales(&predictions, &scaler),
            &invert_scale_sales(&y_eval, &scaler),
        );
        info!(
            "Evaluation on {} samples: loss={:.6}, mae={:.6}, mae (sales)={:.2}",
            metrics.samples, metrics.loss, metrics.mae, sales_mae
        );
    }

    let paths = ArtifactPaths::new(&args.output_dir);
    paths
        .create_dir()
        .with_context(|| format!("failed to create {}", paths.root().display()))?;
    model.save(paths.model())?;
    scaler.save(paths.scaler())?;
    config.save(paths.config())?;

    println!("\n=== Training complete ===");
    println!("Epochs:       {}", history.epochs());
    if let Some(loss) = history.train_loss.last() {
        println!("Final loss:   {:.6}", loss);
    }
    if let Some(mae) = history.train_mae.last() {
        println!("Final mae:    {:.6}", mae);
    }
    println!("Artifacts in: {}", paths.root().display());

    Ok(())
}
