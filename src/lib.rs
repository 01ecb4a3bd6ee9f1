//! # Sales Forecast
//!
//! Next-day store sales forecasting with a small 1D convolutional network.
//!
//! Daily store records are read from CSV, day-of-week is one-hot encoded,
//! every feature is min-max scaled into `[0, 1]` and the scaled rows are cut
//! into fixed-length look-back windows. Each window is paired with the scaled
//! sales value of the following day and fed to [`SalesCnn`].
//!
//! ## Modules
//!
//! - `data` - Record loading, feature schema, scaling, windowing and batching
//! - `model` - CNN architecture, compilation and training loop
//! - `utils` - Configuration and logging
//!
//! ## Example
//!
//! ```no_run
//! use burn::backend::{Autodiff, NdArray};
//! use sales_forecast::{build_scaler, load_features, model_fn, Config};
//!
//! fn main() -> sales_forecast::Result<()> {
//!     let config = Config::default();
//!     let files = ["train.csv"];
//!
//!     let scaler = build_scaler(&files, &config.data.schema()?, &config.data.loader_options()?)?;
//!     let (x, y) = load_features(&files, &scaler, &config.data.pipeline_config()?)?;
//!
//!     let device = Default::default();
//!     let mut model = model_fn::<Autodiff<NdArray>>(&config.model, &config.compile, &device)?;
//!     let history = model.fit(&x, &y, &config.training)?;
//!     println!("final loss: {:?}", history.train_loss.last());
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod model;
pub mod utils;

// Re-export commonly used types
pub use data::{
    build_scaler, create_windows, invert_scale_sales, load_features, read_raw, Feature,
    FeatureSchema, LoaderOptions, MinMaxScaler, PipelineConfig, SalesBatch, SalesBatcher,
    SalesDataset, WindowSample,
};
pub use error::{Error, Result};
pub use model::{
    compile_model, model_fn, CompileConfig, CompiledModel, EvaluationMetrics, History,
    ModelConfig, SalesCnn, TrainingConfig,
};
pub use utils::{setup_logging, ArtifactPaths, Config};

/// Number of consecutive days fed to the model for one prediction.
pub const DEFAULT_LOOK_BACK: usize = 20;
