//! Model, compilation and training configuration

use crate::data::FeatureSchema;
use crate::error::{Error, Result};
use crate::DEFAULT_LOOK_BACK;
use serde::{Deserialize, Serialize};

/// CNN architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Time steps per input window
    pub look_back: usize,
    /// Features per time step
    pub num_features: usize,
    /// Filters in the first convolution
    pub conv1_filters: usize,
    /// Kernel size of the first convolution
    pub conv1_kernel: usize,
    /// Filters in the second convolution
    pub conv2_filters: usize,
    /// Kernel size of the second convolution
    pub conv2_kernel: usize,
    /// Units in each of the two hidden dense layers
    pub dense_units: usize,
    /// Dropout rate
    pub dropout: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            look_back: DEFAULT_LOOK_BACK,
            num_features: FeatureSchema::default().len(),
            conv1_filters: 32,
            conv1_kernel: 5,
            conv2_filters: 64,
            conv2_kernel: 3,
            dense_units: 64,
            dropout: 0.5,
        }
    }
}

impl ModelConfig {
    /// Default architecture sized for a given window and schema
    pub fn for_input(look_back: usize, schema: &FeatureSchema) -> Self {
        Self {
            look_back,
            num_features: schema.len(),
            ..Default::default()
        }
    }

    /// Input shape of one sample, `[look_back, num_features]`
    pub fn input_shape(&self) -> [usize; 2] {
        [self.look_back, self.num_features]
    }

    /// Width of the flattened convolution output.
    ///
    /// Same padding keeps the sequence length, so only the filter count of
    /// the last convolution changes the width.
    pub fn flatten_size(&self) -> usize {
        self.look_back * self.conv2_filters
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.look_back == 0 {
            return Err(Error::Config("look_back must be > 0".to_string()));
        }
        if self.num_features == 0 {
            return Err(Error::Config("num_features must be > 0".to_string()));
        }
        if self.conv1_filters == 0 || self.conv2_filters == 0 || self.dense_units == 0 {
            return Err(Error::Config("layer sizes must be > 0".to_string()));
        }
        // Same padding needs a symmetric kernel
        if self.conv1_kernel % 2 == 0 || self.conv2_kernel % 2 == 0 {
            return Err(Error::Config("kernel sizes must be odd".to_string()));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(Error::Config("dropout must be in [0, 1)".to_string()));
        }
        Ok(())
    }
}

/// Optimizer settings bound at compile time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Adam step size
    pub learning_rate: f64,
    /// Adam first moment decay
    pub beta_1: f32,
    /// Adam second moment decay
    pub beta_2: f32,
    /// Adam numerical stability term
    pub epsilon: f32,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-7,
        }
    }
}

impl CompileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.learning_rate <= 0.0 {
            return Err(Error::Config("learning_rate must be > 0".to_string()));
        }
        if !(0.0..1.0).contains(&self.beta_1) || !(0.0..1.0).contains(&self.beta_2) {
            return Err(Error::Config("betas must be in [0, 1)".to_string()));
        }
        if self.epsilon <= 0.0 {
            return Err(Error::Config("epsilon must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Training loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of passes over the training samples
    pub epochs: usize,
    /// Samples per gradient step
    pub batch_size: usize,
    /// Trailing fraction of samples held out for validation
    pub validation_split: f64,
    /// Reshuffle training samples every epoch
    pub shuffle: bool,
    /// Seed for per-epoch shuffling and the backend RNG while training
    pub seed: u64,
    /// Log every N batches
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            validation_split: 0.0,
            shuffle: true,
            seed: 42,
            log_interval: 100,
        }
    }
}

impl TrainingConfig {
    /// Short run for smoke tests
    pub fn quick() -> Self {
        Self {
            epochs: 2,
            batch_size: 16,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::Config("epochs must be > 0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".to_string()));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(Error::Config("validation_split must be in [0, 1)".to_string()));
        }
        if self.log_interval == 0 {
            return Err(Error::Config("log_interval must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(ModelConfig::default().validate().is_ok());
        assert!(CompileConfig::default().validate().is_ok());
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(TrainingConfig::quick().validate().is_ok());
    }

    #[test]
    fn test_default_input_shape() {
        let config = ModelConfig::default();
        assert_eq!(config.input_shape(), [20, 11]);
        assert_eq!(config.flatten_size(), 20 * 64);
    }

    #[test]
    fn test_invalid_model_config() {
        let even_kernel = ModelConfig {
            conv1_kernel: 4,
            ..Default::default()
        };
        assert!(even_kernel.validate().is_err());

        let full_dropout = ModelConfig {
            dropout: 1.0,
            ..Default::default()
        };
        assert!(full_dropout.validate().is_err());
    }

    #[test]
    fn test_for_input() {
        let schema = FeatureSchema::from_names(&["Sales", "Open", "Promo"]).unwrap();
        let config = ModelConfig::for_input(7, &schema);
        assert_eq!(config.input_shape(), [7, 3]);
        assert!(config.validate().is_ok());
    }
}
