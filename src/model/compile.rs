//! Binding a model to its loss, optimizer and reported metric

use super::cnn::SalesCnn;
use super::config::{CompileConfig, ModelConfig};
use crate::error::{Error, Result};
use burn::{
    module::{AutodiffModule, Module},
    nn::loss::MseLoss,
    optim::{AdamConfig, Optimizer},
    record::CompactRecorder,
    tensor::{
        backend::{AutodiffBackend, Backend},
        Tensor,
    },
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Metric reported next to the loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    MeanAbsoluteError,
}

impl Metric {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Metric::MeanAbsoluteError => "mae",
        }
    }

    /// Mean over the batch
    pub fn compute<B: Backend>(&self, predictions: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        match self {
            Metric::MeanAbsoluteError => (predictions - targets).abs().mean(),
        }
    }
}

/// A model bound to MSE loss, the Adam optimizer and the MAE metric
pub struct CompiledModel<B: AutodiffBackend, O> {
    pub(crate) model: SalesCnn<B>,
    pub(crate) optimizer: O,
    pub(crate) loss: MseLoss,
    pub(crate) metric: Metric,
    pub(crate) learning_rate: f64,
    pub(crate) device: B::Device,
}

impl<B, O> CompiledModel<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<SalesCnn<B>, B>,
{
    /// The underlying network
    pub fn model(&self) -> &SalesCnn<B> {
        &self.model
    }

    /// The network without autodiff tracking, for inference
    pub fn inference_model(&self) -> SalesCnn<B::InnerBackend> {
        self.model.valid()
    }

    /// Reported metric
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Optimizer step size
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Device the model lives on
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Save weights with [`CompactRecorder`]; `path` is given without extension
    pub fn save<P: Into<PathBuf>>(&self, path: P) -> Result<()> {
        let path = path.into();
        self.inference_model()
            .save_file(path.clone(), &CompactRecorder::new())
            .map_err(|e| Error::Record(format!("{:?}", e)))?;
        info!("Saved model weights to {:?}", path);
        Ok(())
    }

    /// Replace the weights with ones saved by [`CompiledModel::save`]
    pub fn load_weights<P: Into<PathBuf>>(&mut self, path: P) -> Result<()> {
        self.model = self
            .model
            .clone()
            .load_file(path, &CompactRecorder::new(), &self.device)
            .map_err(|e| Error::Record(format!("{:?}", e)))?;
        Ok(())
    }
}

/// Compile a model: MSE loss, Adam, MAE metric
pub fn compile_model<B: AutodiffBackend>(
    model: SalesCnn<B>,
    config: &CompileConfig,
    device: &B::Device,
) -> Result<CompiledModel<B, impl Optimizer<SalesCnn<B>, B>>> {
    config.validate()?;

    let optimizer = AdamConfig::new()
        .with_beta_1(config.beta_1)
        .with_beta_2(config.beta_2)
        .with_epsilon(config.epsilon)
        .init::<B, SalesCnn<B>>();

    info!(
        "Compiled model with {} parameters (loss=mse, optimizer=adam, lr={}, metric=mae)",
        model.num_params(),
        config.learning_rate
    );

    Ok(CompiledModel {
        model,
        optimizer,
        loss: MseLoss::new(),
        metric: Metric::MeanAbsoluteError,
        learning_rate: config.learning_rate,
        device: device.clone(),
    })
}

/// Build the sales CNN and compile it in one step
pub fn model_fn<B: AutodiffBackend>(
    model_config: &ModelConfig,
    compile_config: &CompileConfig,
    device: &B::Device,
) -> Result<CompiledModel<B, impl Optimizer<SalesCnn<B>, B>>> {
    model_config.validate()?;
    let model = SalesCnn::new(device, model_config);
    compile_model(model, compile_config, device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::TensorData;

    type TestBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_compiled_model_output_shape() {
        let device = Default::default();
        let compiled =
            model_fn::<TestBackend>(&ModelConfig::default(), &CompileConfig::default(), &device)
                .unwrap();

        let input = Tensor::<TestBackend, 3>::zeros([5, 20, 11], &device);
        let output = compiled.model().forward(input);
        assert_eq!(output.dims(), [5, 1]);
        assert_eq!(compiled.metric(), Metric::MeanAbsoluteError);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let device = Default::default();
        let bad_model = ModelConfig {
            conv2_kernel: 2,
            ..Default::default()
        };
        assert!(model_fn::<TestBackend>(&bad_model, &CompileConfig::default(), &device).is_err());

        let bad_compile = CompileConfig {
            learning_rate: 0.0,
            ..Default::default()
        };
        assert!(model_fn::<TestBackend>(&ModelConfig::default(), &bad_compile, &device).is_err());
    }

    #[test]
    fn test_mae_metric() {
        let device = Default::default();
        let predictions =
            Tensor::<NdArray<f32>, 2>::from_data(TensorData::new(vec![1.0f32, 2.0, 3.0], [3, 1]), &device);
        let targets =
            Tensor::<NdArray<f32>, 2>::from_data(TensorData::new(vec![2.0f32, 2.0, 5.0], [3, 1]), &device);

        let mae: Vec<f32> = Metric::MeanAbsoluteError
            .compute(predictions, targets)
            .into_data()
            .to_vec()
            .unwrap();
        assert!((mae[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_and_load_weights() {
        let device = Default::default();
        let config = ModelConfig::default();
        let compiled =
            model_fn::<TestBackend>(&config, &CompileConfig::default(), &device).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        compiled.save(path.clone()).unwrap();

        let loaded = SalesCnn::<NdArray<f32>>::load(&config, path, &device).unwrap();
        let input = Tensor::<NdArray<f32>, 3>::ones([2, 20, 11], &device);

        let expected: Vec<f32> = compiled
            .inference_model()
            .forward(input.clone())
            .into_data()
            .to_vec()
            .unwrap();
        let actual: Vec<f32> = loaded.forward(input).into_data().to_vec().unwrap();
        for (a, b) in expected.iter().zip(actual.iter()) {
            assert!((a - b).abs() < 1e-2);
        }
    }
}
