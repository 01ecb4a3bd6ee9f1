//! # Sales CNN
//!
//! Convolutional regression network built on the Burn framework, its
//! compilation (loss, optimizer, metric) and the training loop.

mod cnn;
mod compile;
mod config;
mod training;

pub use cnn::SalesCnn;
pub use compile::{compile_model, model_fn, CompiledModel, Metric};
pub use config::{CompileConfig, ModelConfig, TrainingConfig};
pub use training::{
    mean_absolute_error, mean_squared_error, predict_windows, EvaluationMetrics, History,
};
