//! 1D CNN sales regressor
//!
//! ```text
//! [batch, look_back, features]
//!   -> Conv1d(32, k=5, same) -> ReLU -> Dropout(0.5)
//!   -> Conv1d(64, k=3, same) -> ReLU -> Flatten
//!   -> Dense(64) -> ReLU -> Dropout(0.5)
//!   -> Dense(64) -> ReLU -> Dropout(0.5)
//!   -> Dense(1)
//! ```

use super::config::ModelConfig;
use crate::error::{Error, Result};
use burn::{
    module::Module,
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig1d, Relu,
    },
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor},
};
use std::path::PathBuf;

/// Convolutional network mapping one look-back window to one sales value
#[derive(Module, Debug)]
pub struct SalesCnn<B: Backend> {
    conv1: Conv1d<B>,
    dropout1: Dropout,
    conv2: Conv1d<B>,
    dense1: Linear<B>,
    dropout2: Dropout,
    dense2: Linear<B>,
    dropout3: Dropout,
    output: Linear<B>,
    activation: Relu,
    look_back: usize,
    num_features: usize,
}

impl<B: Backend> SalesCnn<B> {
    /// Create a freshly initialized model
    pub fn new(device: &B::Device, config: &ModelConfig) -> Self {
        let conv1 = Conv1dConfig::new(config.num_features, config.conv1_filters, config.conv1_kernel)
            .with_padding(PaddingConfig1d::Same)
            .init(device);
        let conv2 = Conv1dConfig::new(config.conv1_filters, config.conv2_filters, config.conv2_kernel)
            .with_padding(PaddingConfig1d::Same)
            .init(device);

        let dense1 = LinearConfig::new(config.flatten_size(), config.dense_units).init(device);
        let dense2 = LinearConfig::new(config.dense_units, config.dense_units).init(device);
        let output = LinearConfig::new(config.dense_units, 1).init(device);

        Self {
            conv1,
            dropout1: DropoutConfig::new(config.dropout).init(),
            conv2,
            dense1,
            dropout2: DropoutConfig::new(config.dropout).init(),
            dense2,
            dropout3: DropoutConfig::new(config.dropout).init(),
            output,
            activation: Relu::new(),
            look_back: config.look_back,
            num_features: config.num_features,
        }
    }

    /// Build the architecture and load weights saved with [`CompactRecorder`].
    ///
    /// `path` is given without the `.mpk` extension.
    pub fn load<P: Into<PathBuf>>(config: &ModelConfig, path: P, device: &B::Device) -> Result<Self> {
        config.validate()?;
        Self::new(device, config)
            .load_file(path, &CompactRecorder::new(), device)
            .map_err(|e| Error::Record(format!("{:?}", e)))
    }

    /// Forward pass, `[batch, look_back, features]` to `[batch, 1]`.
    ///
    /// Dropout is only active on autodiff backends.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        // Conv1d expects [batch, channels, length]
        let x = x.swap_dims(1, 2);

        let x = self.activation.forward(self.conv1.forward(x));
        let x = self.dropout1.forward(x);
        let x = self.activation.forward(self.conv2.forward(x));

        let x: Tensor<B, 2> = x.flatten(1, 2);

        let x = self.activation.forward(self.dense1.forward(x));
        let x = self.dropout2.forward(x);
        let x = self.activation.forward(self.dense2.forward(x));
        let x = self.dropout3.forward(x);

        self.output.forward(x)
    }

    /// Time steps per input window
    pub fn look_back(&self) -> usize {
        self.look_back
    }

    /// Features per time step
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Fail unless `shape` is `[batch, look_back, num_features]`
    pub fn check_input_shape(&self, shape: &[usize]) -> Result<()> {
        let batch = shape.first().copied().unwrap_or(0);
        let expected = vec![batch, self.look_back, self.num_features];
        if shape != expected.as_slice() {
            return Err(Error::ShapeMismatch {
                expected,
                found: shape.to_vec(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_forward_pass_shape() {
        let device = Default::default();
        let model: SalesCnn<TestBackend> = SalesCnn::new(&device, &ModelConfig::default());

        let input = Tensor::<TestBackend, 3>::zeros([4, 20, 11], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [4, 1]);
    }

    #[test]
    fn test_custom_input_size() {
        let device = Default::default();
        let config = ModelConfig {
            look_back: 7,
            num_features: 3,
            ..Default::default()
        };
        let model: SalesCnn<TestBackend> = SalesCnn::new(&device, &config);

        let input = Tensor::<TestBackend, 3>::ones([2, 7, 3], &device);
        assert_eq!(model.forward(input).dims(), [2, 1]);
        assert_eq!(model.look_back(), 7);
        assert_eq!(model.num_features(), 3);
    }

    #[test]
    fn test_check_input_shape() {
        let device = Default::default();
        let model: SalesCnn<TestBackend> = SalesCnn::new(&device, &ModelConfig::default());

        assert!(model.check_input_shape(&[8, 20, 11]).is_ok());
        assert!(model.check_input_shape(&[8, 11, 20]).is_err());
        assert!(model.check_input_shape(&[8, 20]).is_err());
    }

    #[test]
    fn test_inference_is_deterministic() {
        let device = Default::default();
        let model: SalesCnn<TestBackend> = SalesCnn::new(&device, &ModelConfig::default());

        let input = Tensor::<TestBackend, 3>::ones([3, 20, 11], &device);
        let a: Vec<f32> = model.forward(input.clone()).into_data().to_vec().unwrap();
        let b: Vec<f32> = model.forward(input).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }
}
