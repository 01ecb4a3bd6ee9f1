//! Training, evaluation and prediction

use super::cnn::SalesCnn;
use super::compile::CompiledModel;
use super::config::TrainingConfig;
use crate::data::{SalesBatcher, SalesDataset};
use crate::error::{Error, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    nn::loss::Reduction,
    optim::{GradientsParams, Optimizer},
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion, Tensor, TensorData,
    },
};
use ndarray::{Array1, Array3, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Samples per forward pass when predicting
const PREDICT_BATCH_SIZE: usize = 256;

/// Per-epoch training history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub train_loss: Vec<f32>,
    pub train_mae: Vec<f32>,
    /// Empty when no validation split was requested
    pub val_loss: Vec<f32>,
    pub val_mae: Vec<f32>,
}

impl History {
    /// Number of completed epochs
    pub fn epochs(&self) -> usize {
        self.train_loss.len()
    }
}

/// Loss and metric over a dataset, in scaled units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Mean squared error
    pub loss: f32,
    /// Mean absolute error
    pub mae: f32,
    /// Number of evaluated samples
    pub samples: usize,
}

impl<B, O> CompiledModel<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<SalesCnn<B>, B>,
{
    /// Train on `x: [n, look_back, features]`, `y: [n]`.
    ///
    /// The trailing `validation_split` fraction is held out before shuffling
    /// and evaluated after every epoch.
    pub fn fit(
        &mut self,
        x: &Array3<f32>,
        y: &Array1<f32>,
        config: &TrainingConfig,
    ) -> Result<History> {
        config.validate()?;
        self.model.check_input_shape(x.shape())?;

        let dataset = SalesDataset::from_arrays(x, y)?;
        let (mut train, valid) = dataset.split_validation(config.validation_split);
        if train.is_empty() {
            return Err(Error::EmptyData("no training samples".to_string()));
        }

        info!(
            "Starting training for {} epochs: train samples: {}, val samples: {}",
            config.epochs,
            train.len(),
            valid.len()
        );

        B::seed(config.seed);
        let batcher = SalesBatcher::<B>::new(self.device.clone());
        let mut history = History::default();

        for epoch in 0..config.epochs {
            if config.shuffle {
                train.shuffle(config.seed.wrapping_add(epoch as u64));
            }

            let mut loss_sum = 0.0;
            let mut mae_sum = 0.0;

            for (batch_idx, items) in train.samples().chunks(config.batch_size).enumerate() {
                let batch_len = items.len() as f32;
                let batch = batcher.batch(items.to_vec());

                let output = self.model.forward(batch.features);
                let loss = self
                    .loss
                    .forward(output.clone(), batch.targets.clone(), Reduction::Mean);
                let mae = self.metric.compute(output, batch.targets);

                let loss_value = loss.clone().into_scalar().elem::<f32>();
                loss_sum += loss_value * batch_len;
                mae_sum += mae.into_scalar().elem::<f32>() * batch_len;

                let grads = GradientsParams::from_grads(loss.backward(), &self.model);
                self.model = self
                    .optimizer
                    .step(self.learning_rate, self.model.clone(), grads);

                if (batch_idx + 1) % config.log_interval == 0 {
                    debug!("Epoch {} Batch {}: loss={:.6}", epoch + 1, batch_idx + 1, loss_value);
                }
            }

            let n = train.len() as f32;
            history.train_loss.push(loss_sum / n);
            history.train_mae.push(mae_sum / n);

            if valid.is_empty() {
                info!(
                    "Epoch {}/{}: loss={:.6}, {}={:.6}",
                    epoch + 1,
                    config.epochs,
                    loss_sum / n,
                    self.metric.name(),
                    mae_sum / n
                );
            } else {
                let val = self.evaluate_dataset(&valid, config.batch_size)?;
                history.val_loss.push(val.loss);
                history.val_mae.push(val.mae);
                info!(
                    "Epoch {}/{}: loss={:.6}, {}={:.6}, val_loss={:.6}, val_{}={:.6}",
                    epoch + 1,
                    config.epochs,
                    loss_sum / n,
                    self.metric.name(),
                    mae_sum / n,
                    val.loss,
                    self.metric.name(),
                    val.mae
                );
            }
        }

        Ok(history)
    }

    /// Loss and metric on `x`, `y` with dropout disabled
    pub fn evaluate(&self, x: &Array3<f32>, y: &Array1<f32>) -> Result<EvaluationMetrics> {
        self.model.check_input_shape(x.shape())?;
        let dataset = SalesDataset::from_arrays(x, y)?;
        self.evaluate_dataset(&dataset, PREDICT_BATCH_SIZE)
    }

    fn evaluate_dataset(&self, dataset: &SalesDataset, batch_size: usize) -> Result<EvaluationMetrics> {
        if dataset.is_empty() {
            return Err(Error::EmptyData("no samples to evaluate".to_string()));
        }

        let model = self.model.valid();
        let batcher = SalesBatcher::<B::InnerBackend>::new(self.device.clone());

        let mut loss_sum = 0.0;
        let mut mae_sum = 0.0;

        for items in dataset.samples().chunks(batch_size) {
            let batch_len = items.len() as f32;
            let batch = batcher.batch(items.to_vec());

            let output = model.forward(batch.features);
            let loss = self
                .loss
                .forward(output.clone(), batch.targets.clone(), Reduction::Mean);
            let mae = self.metric.compute(output, batch.targets);

            loss_sum += loss.into_scalar().elem::<f32>() * batch_len;
            mae_sum += mae.into_scalar().elem::<f32>() * batch_len;
        }

        let n = dataset.len() as f32;
        Ok(EvaluationMetrics {
            loss: loss_sum / n,
            mae: mae_sum / n,
            samples: dataset.len(),
        })
    }

    /// Scaled sales predictions for every window, dropout disabled
    pub fn predict(&self, x: &Array3<f32>) -> Result<Array1<f32>> {
        predict_windows(&self.model.valid(), x, &self.device)
    }
}

/// Run a model over `x: [n, look_back, features]` in batches
pub fn predict_windows<B: Backend>(
    model: &SalesCnn<B>,
    x: &Array3<f32>,
    device: &B::Device,
) -> Result<Array1<f32>> {
    model.check_input_shape(x.shape())?;

    let mut predictions = Vec::with_capacity(x.len_of(Axis(0)));
    for chunk in x.axis_chunks_iter(Axis(0), PREDICT_BATCH_SIZE) {
        let (batch, look_back, num_features) = chunk.dim();
        let data: Vec<f32> = chunk.iter().copied().collect();
        let input = Tensor::<B, 3>::from_data(
            TensorData::new(data, [batch, look_back, num_features]),
            device,
        );

        let output: Vec<f32> = model
            .forward(input)
            .into_data()
            .to_vec()
            .map_err(|e| Error::Tensor(format!("{:?}", e)))?;
        predictions.extend(output);
    }

    Ok(Array1::from_vec(predictions))
}

/// MSE between two host arrays
pub fn mean_squared_error(predictions: &Array1<f32>, targets: &Array1<f32>) -> f32 {
    if predictions.is_empty() {
        return 0.0;
    }
    (predictions - targets).mapv(|d| d * d).mean().unwrap_or(0.0)
}

/// MAE between predictions and targets
pub fn mean_absolute_error(predictions: &Array1<f32>, targets: &Array1<f32>) -> f32 {
    if predictions.is_empty() {
        return 0.0;
    }
    (predictions - targets).mapv(f32::abs).mean().unwrap_or(0.0)
}
